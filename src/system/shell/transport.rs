//! Console transport the shell reads from and renders to.
//!
//! The shell does not own a console. The input loop gets a [`ReadByte`]
//! source and the render surface gets a [`Sink`]; on a device these wrap a
//! UART driver, on a host the [`IoReader`] and [`IoSink`] adapters wrap
//! anything implementing `std::io`.

/// Blocking byte source.
pub trait ReadByte {
    /// Associated error type
    type Error: core::fmt::Debug;
    /// Block until a byte is available. `Ok(None)` means the input is closed.
    fn read_byte(&mut self) -> Result<Option<u8>, Self::Error>;
}

/// Byte sink with explicit flush.
pub trait Sink {
    /// Associated error type
    type Error: core::fmt::Debug;
    /// Write all of `buf`.
    fn write(&mut self, buf: &[u8]) -> Result<(), Self::Error>;
    /// Push buffered bytes out to the console.
    fn flush(&mut self) -> Result<(), Self::Error>;
}

impl<T: Sink + ?Sized> Sink for &mut T {
    type Error = T::Error;

    fn write(&mut self, buf: &[u8]) -> Result<(), Self::Error> {
        (**self).write(buf)
    }

    fn flush(&mut self) -> Result<(), Self::Error> {
        (**self).flush()
    }
}

#[cfg(feature = "std")]
pub use self::io::{IoReader, IoSink};

#[cfg(feature = "std")]
mod io {
    use std::io::{ErrorKind, Read, Write};

    use super::{ReadByte, Sink};

    /// [`ReadByte`] over any [`std::io::Read`].
    #[derive(Debug)]
    pub struct IoReader<R> {
        inner: R,
    }

    impl<R: Read> IoReader<R> {
        /// Wrap a reader.
        pub fn new(inner: R) -> Self {
            Self { inner }
        }

        /// Unwrap the reader.
        pub fn into_inner(self) -> R {
            self.inner
        }
    }

    impl<R: Read> ReadByte for IoReader<R> {
        type Error = std::io::Error;

        fn read_byte(&mut self) -> Result<Option<u8>, Self::Error> {
            let mut byte = [0u8; 1];
            loop {
                match self.inner.read(&mut byte) {
                    Ok(0) => return Ok(None),
                    Ok(_) => return Ok(Some(byte[0])),
                    Err(e) if e.kind() == ErrorKind::Interrupted => continue,
                    Err(e) => return Err(e),
                }
            }
        }
    }

    /// [`Sink`] over any [`std::io::Write`].
    #[derive(Debug)]
    pub struct IoSink<W> {
        inner: W,
    }

    impl<W: Write> IoSink<W> {
        /// Wrap a writer.
        pub fn new(inner: W) -> Self {
            Self { inner }
        }

        /// Unwrap the writer.
        pub fn into_inner(self) -> W {
            self.inner
        }
    }

    impl<W: Write> Sink for IoSink<W> {
        type Error = std::io::Error;

        fn write(&mut self, buf: &[u8]) -> Result<(), Self::Error> {
            self.inner.write_all(buf)
        }

        fn flush(&mut self) -> Result<(), Self::Error> {
            self.inner.flush()
        }
    }

}
