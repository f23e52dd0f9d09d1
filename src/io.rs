//! Transport contract for the request reader.
use std::io;
use std::pin::Pin;
use std::task::{Context, Poll, ready};

use bytes::{BufMut, BytesMut};
use tokio::io::{AsyncRead, ReadBuf};
use tokio::net::TcpStream;
#[cfg(unix)]
use tokio::net::UnixStream;

/// Byte source driven by [`RequestReader`].
///
/// One primitive is required: a non-blocking read of some bytes into the
/// spare capacity of `buf`. Exact-length reads are the reader looping this
/// primitive until the shortfall is zero. A zero-length success is treated
/// by the reader as no progress; the bundled impls report end-of-stream as
/// [`io::ErrorKind::UnexpectedEof`] instead of returning it.
///
/// Connection teardown is expressed through ownership: on a transport
/// error the reader drops the source without delivering the request.
///
/// [`RequestReader`]: crate::h1::RequestReader
pub trait Io {
    fn poll_read_buf(&mut self, buf: &mut BytesMut, cx: &mut Context<'_>) -> Poll<io::Result<usize>>;
}

fn poll_read_spare<T>(io: &mut T, buf: &mut BytesMut, cx: &mut Context<'_>) -> Poll<io::Result<usize>>
where
    T: AsyncRead + Unpin,
{
    let mut read_buf = ReadBuf::uninit(buf.spare_capacity_mut());
    ready!(Pin::new(io).poll_read(cx, &mut read_buf))?;

    let read = read_buf.filled().len();
    if read == 0 {
        return Poll::Ready(Err(io::ErrorKind::UnexpectedEof.into()));
    }

    // SAFETY: `poll_read` initialized `read` bytes of the spare capacity
    unsafe { buf.advance_mut(read) };
    Poll::Ready(Ok(read))
}

impl Io for TcpStream {
    #[inline]
    fn poll_read_buf(&mut self, buf: &mut BytesMut, cx: &mut Context<'_>) -> Poll<io::Result<usize>> {
        poll_read_spare(self, buf, cx)
    }
}

#[cfg(unix)]
impl Io for UnixStream {
    #[inline]
    fn poll_read_buf(&mut self, buf: &mut BytesMut, cx: &mut Context<'_>) -> Poll<io::Result<usize>> {
        poll_read_spare(self, buf, cx)
    }
}

impl Io for tokio::io::DuplexStream {
    #[inline]
    fn poll_read_buf(&mut self, buf: &mut BytesMut, cx: &mut Context<'_>) -> Poll<io::Result<usize>> {
        poll_read_spare(self, buf, cx)
    }
}
