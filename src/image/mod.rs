pub mod f32;
pub mod io;
pub mod rgb;
pub mod u8;

pub use self::f32::ImageF32;
pub use self::rgb::RgbImageU8;
pub use self::u8::GrayImageU8;
