use crate::texture::TextureId;

/// Errors raised while configuring the canvas or looking up registered textures.
///
/// Stroke interpolation and staging never fail; their overflow behaviour is
/// silent by policy and reported through frame statistics instead.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("canvas extent must be positive and finite, got {width}x{height}")]
    InvalidExtent { width: f32, height: f32 },

    #[error("{what} capacity must be at least 1")]
    ZeroCapacity { what: &'static str },

    #[error("brush stamp size must be positive and finite, got {0}")]
    InvalidStampSize(f32),

    #[error("texture {0:?} is not registered")]
    UnknownTexture(TextureId),
}

pub type Result<T> = std::result::Result<T, Error>;
