//! Response bodies seen by the post-handler hook.
//!
//! Storing a response requires its complete body, so the hook drains the
//! handler's body stream before touching the store. Whatever happens, the
//! client must receive exactly what the handler produced:
//!
//! - **Complete**: the body was fully read and is replayed from memory
//! - **Partial**: the stream failed; the bytes read so far are replayed and
//!   then the original error is yielded
//! - **Passthrough**: the body was never read (non-cacheable requests, already
//!   cached keys, unsuccessful responses)

use bytes::{Buf, BufMut, Bytes, BytesMut};
use http_body::{Body as HttpBody, Frame};
use http_body_util::BodyExt;
use pin_project::pin_project;
use std::fmt;
use std::pin::Pin;
use std::task::{Context, Poll};

/// A response body in one of its consumption states.
#[pin_project(project = BufferedBodyProj)]
pub enum BufferedBody<B>
where
    B: HttpBody,
{
    /// Body was fully read.
    ///
    /// The `Option` is used to yield the data once, then end the stream.
    Complete(Option<Bytes>),

    /// Body failed mid-stream: yields the prefix, then the error once.
    Partial {
        /// Bytes read before the failure.
        prefix: Option<Bytes>,
        /// The stream error, taken when yielded.
        error: Option<B::Error>,
    },

    /// Body was passed through without reading.
    Passthrough(#[pin] B),
}

impl<B> BufferedBody<B>
where
    B: HttpBody,
{
    /// Returns the buffered bytes of a complete body.
    pub fn complete_bytes(&self) -> Option<&Bytes> {
        match self {
            BufferedBody::Complete(bytes) => bytes.as_ref(),
            _ => None,
        }
    }
}

impl<B> From<Bytes> for BufferedBody<B>
where
    B: HttpBody,
{
    fn from(bytes: Bytes) -> Self {
        BufferedBody::Complete(Some(bytes))
    }
}

impl<B> HttpBody for BufferedBody<B>
where
    B: HttpBody,
{
    type Data = Bytes;
    type Error = B::Error;

    fn poll_frame(
        self: Pin<&mut Self>,
        cx: &mut Context<'_>,
    ) -> Poll<Option<Result<Frame<Self::Data>, Self::Error>>> {
        match self.project() {
            BufferedBodyProj::Complete(data) => match data.take() {
                Some(bytes) if !bytes.is_empty() => Poll::Ready(Some(Ok(Frame::data(bytes)))),
                _ => Poll::Ready(None),
            },
            BufferedBodyProj::Partial { prefix, error } => {
                if let Some(bytes) = prefix.take() {
                    return Poll::Ready(Some(Ok(Frame::data(bytes))));
                }
                Poll::Ready(error.take().map(Err))
            }
            BufferedBodyProj::Passthrough(body) => match body.poll_frame(cx) {
                Poll::Ready(Some(Ok(frame))) => {
                    let frame = frame.map_data(|mut data| data.copy_to_bytes(data.remaining()));
                    Poll::Ready(Some(Ok(frame)))
                }
                Poll::Ready(Some(Err(e))) => Poll::Ready(Some(Err(e))),
                Poll::Ready(None) => Poll::Ready(None),
                Poll::Pending => Poll::Pending,
            },
        }
    }

    fn size_hint(&self) -> http_body::SizeHint {
        match self {
            BufferedBody::Complete(Some(bytes)) => {
                http_body::SizeHint::with_exact(bytes.len() as u64)
            }
            BufferedBody::Complete(None) => http_body::SizeHint::with_exact(0),
            BufferedBody::Partial { prefix, .. } => {
                let mut hint = http_body::SizeHint::new();
                hint.set_lower(prefix.as_ref().map_or(0, |bytes| bytes.len() as u64));
                hint
            }
            BufferedBody::Passthrough(body) => body.size_hint(),
        }
    }

    fn is_end_stream(&self) -> bool {
        match self {
            BufferedBody::Complete(bytes) => bytes.as_ref().is_none_or(Bytes::is_empty),
            BufferedBody::Partial { prefix, error } => prefix.is_none() && error.is_none(),
            BufferedBody::Passthrough(body) => body.is_end_stream(),
        }
    }
}

impl<B> fmt::Debug for BufferedBody<B>
where
    B: HttpBody,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BufferedBody::Complete(bytes) => f.debug_tuple("Complete").field(bytes).finish(),
            BufferedBody::Partial { prefix, error } => f
                .debug_struct("Partial")
                .field("prefix", prefix)
                .field("error", &error.is_some())
                .finish(),
            BufferedBody::Passthrough(_) => f.write_str("Passthrough"),
        }
    }
}

/// Drains `body` to its end.
///
/// Trailers are not kept. On a stream error, the bytes read so far are
/// returned in a [`BufferedBody::Partial`] together with the error.
pub async fn collect_body<B>(body: B) -> Result<Bytes, BufferedBody<B>>
where
    B: HttpBody,
{
    let mut body = std::pin::pin!(body);
    let mut buffer = BytesMut::new();
    while let Some(frame) = body.frame().await {
        match frame {
            Ok(frame) => {
                if let Ok(data) = frame.into_data() {
                    buffer.put(data);
                }
            }
            Err(error) => {
                let prefix = (!buffer.is_empty()).then(|| buffer.freeze());
                return Err(BufferedBody::Partial {
                    prefix,
                    error: Some(error),
                });
            }
        }
    }
    Ok(buffer.freeze())
}
