use rand::{rngs::OsRng, Rng};

pub const OTP_LENGTH: usize = 6;

/// Six zero-padded digits drawn uniformly from 000000..=999999.
pub fn generate_otp() -> String {
    let code: u32 = OsRng.gen_range(0..1_000_000);
    format!("{code:06}")
}
