#[cfg(feature = "runtime-async-std")]
pub use async_std::io::{Read, ReadExt, Write, WriteExt};
#[cfg(feature = "runtime-tokio")]
pub use tokio::io::{
    AsyncRead as Read, AsyncReadExt as ReadExt, AsyncWrite as Write, AsyncWriteExt as WriteExt,
};
