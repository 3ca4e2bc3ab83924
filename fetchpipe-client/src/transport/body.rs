//! Request body type for the hyper client.

use std::pin::Pin;
use std::task::{Context, Poll};

use bytes::Bytes;
use http_body::{Body, Frame, SizeHint};

use crate::ClientError;

/// A request body: empty, or one buffered chunk.
#[derive(Clone, Debug, Default)]
pub enum TransportBody {
    #[default]
    Empty,
    Full { data: Option<Bytes> },
}

impl TransportBody {
    pub fn empty() -> Self {
        TransportBody::Empty
    }

    pub fn full(data: Bytes) -> Self {
        TransportBody::Full { data: Some(data) }
    }

    /// Empty bytes become an empty body.
    pub fn from_bytes(data: Bytes) -> Self {
        if data.is_empty() {
            Self::empty()
        } else {
            Self::full(data)
        }
    }
}

impl Body for TransportBody {
    type Data = Bytes;
    type Error = ClientError;

    fn poll_frame(
        self: Pin<&mut Self>,
        _cx: &mut Context<'_>,
    ) -> Poll<Option<Result<Frame<Self::Data>, Self::Error>>> {
        match self.get_mut() {
            TransportBody::Empty => Poll::Ready(None),
            TransportBody::Full { data } => Poll::Ready(data.take().map(|d| Ok(Frame::data(d)))),
        }
    }

    fn is_end_stream(&self) -> bool {
        match self {
            TransportBody::Empty => true,
            TransportBody::Full { data } => data.is_none(),
        }
    }

    fn size_hint(&self) -> SizeHint {
        match self {
            TransportBody::Empty | TransportBody::Full { data: None } => SizeHint::with_exact(0),
            TransportBody::Full { data: Some(d) } => SizeHint::with_exact(d.len() as u64),
        }
    }
}

impl From<Bytes> for TransportBody {
    fn from(data: Bytes) -> Self {
        Self::from_bytes(data)
    }
}
