//
// Copyright 2017-2026 Hans W. Uhlig. All Rights Reserved.
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//      http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.
//

use crate::TelnetFilter;
use pin_project_lite::pin_project;
use std::io;
use std::pin::Pin;
use std::task::{Context, Poll};
use tokio::io::{AsyncBufRead, AsyncRead, BufReader, ReadBuf};
use tracing::debug;

pin_project! {
    /// Pull adapter that reads Telnet-framed bytes from `R` and yields only text.
    ///
    /// Each read fills as much of the caller's buffer as the currently buffered
    /// raw bytes allow. When those are exhausted and at least one byte has been
    /// produced, the read returns at once instead of waiting for more network
    /// data, so a partial screen update is displayed without delay. The reader
    /// only waits on the source while it has produced nothing.
    ///
    /// Errors from the source are returned unchanged. A stream that ends while a
    /// command is incomplete fails with [`io::ErrorKind::UnexpectedEof`]. After
    /// an error or end of stream the reader is spent and every further read
    /// fails without touching the source.
    ///
    /// # Example
    /// ```rust,no_run
    /// use rawtel_telnetfilter::TelnetReader;
    /// use tokio::io::AsyncReadExt;
    /// use tokio::net::TcpStream;
    ///
    /// # async fn example() -> std::io::Result<()> {
    /// let stream = TcpStream::connect("127.0.0.1:23").await?;
    /// let mut reader = TelnetReader::buffered(stream);
    /// let mut buffer = [0u8; 1024];
    /// let count = reader.read(&mut buffer).await?;
    /// println!("{}", String::from_utf8_lossy(&buffer[..count]));
    /// # Ok(())
    /// # }
    /// ```
    #[derive(Debug)]
    pub struct TelnetReader<R> {
        #[pin]
        inner: R,
        filter: TelnetFilter,
        spent: bool,
    }
}

impl<R: AsyncBufRead> TelnetReader<R> {
    /// Wraps an already buffered source.
    pub fn new(inner: R) -> TelnetReader<R> {
        TelnetReader {
            inner,
            filter: TelnetFilter::new(),
            spent: false,
        }
    }
}

impl<R: AsyncRead> TelnetReader<BufReader<R>> {
    /// Wraps an unbuffered source such as a socket read half.
    pub fn buffered(inner: R) -> TelnetReader<BufReader<R>> {
        TelnetReader::new(BufReader::new(inner))
    }

    /// Wraps an unbuffered source with a read buffer of `capacity` bytes.
    pub fn with_capacity(capacity: usize, inner: R) -> TelnetReader<BufReader<R>> {
        TelnetReader::new(BufReader::with_capacity(capacity, inner))
    }
}

impl<R> TelnetReader<R> {
    /// The filter state driving this reader.
    pub fn filter(&self) -> &TelnetFilter {
        &self.filter
    }

    /// True once the reader has reported end of stream or an error.
    pub fn is_spent(&self) -> bool {
        self.spent
    }

    /// Reference to the underlying source.
    pub fn get_ref(&self) -> &R {
        &self.inner
    }

    /// Mutable reference to the underlying source.
    ///
    /// Reading from it directly desynchronises the filter.
    pub fn get_mut(&mut self) -> &mut R {
        &mut self.inner
    }

    /// Consumes the reader, returning the underlying source.
    pub fn into_inner(self) -> R {
        self.inner
    }
}

impl<R: AsyncBufRead> AsyncRead for TelnetReader<R> {
    fn poll_read(
        self: Pin<&mut Self>,
        cx: &mut Context<'_>,
        buf: &mut ReadBuf<'_>,
    ) -> Poll<io::Result<()>> {
        let mut this = self.project();
        if *this.spent {
            return Poll::Ready(Err(io::Error::other(
                "telnet reader used after termination",
            )));
        }
        if buf.remaining() == 0 {
            return Poll::Ready(Ok(()));
        }
        loop {
            let available = match this.inner.as_mut().poll_fill_buf(cx) {
                Poll::Ready(Ok(available)) => available,
                Poll::Ready(Err(err)) => {
                    debug!("Telnet source failed in state {}: {}", this.filter.state(), err);
                    *this.spent = true;
                    return Poll::Ready(Err(err));
                }
                Poll::Pending => return Poll::Pending,
            };
            if available.is_empty() {
                *this.spent = true;
                if this.filter.is_idle() {
                    debug!("Telnet source reached end of stream");
                    return Poll::Ready(Ok(()));
                }
                return Poll::Ready(Err(this.filter.truncated()));
            }
            let (consumed, produced) = this.filter.filter(available, buf.initialize_unfilled());
            this.inner.as_mut().consume(consumed);
            buf.advance(produced);
            // Either the buffered chunk is exhausted or the output is full.
            // Only go back to the source when nothing has been produced yet.
            if produced > 0 {
                return Poll::Ready(Ok(()));
            }
        }
    }
}
