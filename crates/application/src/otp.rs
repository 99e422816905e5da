//! OTP 验证码生成
//!
//! 验证码通过响应体返回（模拟下发），不接入真实短信通道。

use rand::Rng;

pub trait OtpGenerator: Send + Sync {
    /// 生成一个六位数字验证码
    fn generate(&self) -> String;
}

#[derive(Debug, Default)]
pub struct RandomOtpGenerator;

impl OtpGenerator for RandomOtpGenerator {
    fn generate(&self) -> String {
        let mut rng = rand::rng();
        rng.random_range(100_000..=999_999).to_string()
    }
}
