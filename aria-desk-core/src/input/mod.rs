mod decoder;

pub use decoder::ButtonDecoder;
