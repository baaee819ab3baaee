//! Ordered progress delivery from a worker task to one HTTP response.
//!
//! [`ProgressChannel`] is the single writer, owned by the worker.
//! [`ProgressStream`] is the single reader, handed to the HTTP layer as the
//! response body. Frames are pushed through an unbounded mpsc channel, so
//! `emit` never waits on the network and frames arrive in `emit` order.

use std::convert::Infallible;
use std::pin::Pin;
use std::sync::atomic::{AtomicBool, Ordering};
use std::task::{Context, Poll};

use bytes::Bytes;
use futures::Stream;
use tokio::sync::mpsc;
use tokio_util::sync::{CancellationToken, DropGuard};

use crate::event::ProgressEvent;
use crate::sink::ProgressSink;
use crate::sse::encode_frame;

/// Writer half: encodes events as SSE frames.
pub struct ProgressChannel {
    sender: mpsc::UnboundedSender<Bytes>,
    /// Set once the first frame is dropped because the reader is gone,
    /// so the disconnect is logged only once.
    disconnected: AtomicBool,
}

/// Reader half: a stream of encoded frames, ending when the writer is
/// dropped.
pub struct ProgressStream {
    receiver: mpsc::UnboundedReceiver<Bytes>,
    cancel_on_drop: Option<DropGuard>,
}

impl ProgressChannel {
    /// Create a connected writer/reader pair.
    pub fn open() -> (ProgressChannel, ProgressStream) {
        let (sender, receiver) = mpsc::unbounded_channel();
        (
            ProgressChannel {
                sender,
                disconnected: AtomicBool::new(false),
            },
            ProgressStream {
                receiver,
                cancel_on_drop: None,
            },
        )
    }

    /// Whether the reader has gone away.
    pub fn is_closed(&self) -> bool {
        self.sender.is_closed()
    }
}

impl ProgressSink for ProgressChannel {
    fn emit(&self, event: ProgressEvent) {
        let frame = match encode_frame(&event) {
            Ok(frame) => frame,
            Err(e) => {
                tracing::error!(kind = event.kind(), error = %e, "Failed to encode progress event");
                return;
            }
        };

        if self.sender.send(frame).is_err() && !self.disconnected.swap(true, Ordering::Relaxed) {
            tracing::debug!(
                kind = event.kind(),
                "Progress stream reader is gone, dropping events",
            );
        }
    }
}

impl ProgressStream {
    /// Cancel `token` when this stream is dropped, i.e. when the HTTP layer
    /// discards the response body because the peer disconnected.
    pub fn cancel_on_drop(mut self, token: CancellationToken) -> Self {
        self.cancel_on_drop = Some(token.drop_guard());
        self
    }

    /// Stop cancelling on drop. Used when the writer finished normally and
    /// the body is being torn down after the last frame.
    pub fn disarm(&mut self) {
        if let Some(guard) = self.cancel_on_drop.take() {
            guard.disarm();
        }
    }
}

impl Stream for ProgressStream {
    type Item = Result<Bytes, Infallible>;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        match self.receiver.poll_recv(cx) {
            Poll::Ready(Some(frame)) => Poll::Ready(Some(Ok(frame))),
            Poll::Ready(None) => {
                // Writer finished: nothing left to cancel.
                self.disarm();
                Poll::Ready(None)
            }
            Poll::Pending => Poll::Pending,
        }
    }
}

#[cfg(test)]
mod tests {
    use futures::StreamExt;

    use super::*;
    use crate::sse::decode_frames;

    async fn collect(stream: ProgressStream) -> String {
        let frames: Vec<_> = stream.collect().await;
        frames
            .into_iter()
            .map(|f| String::from_utf8(f.unwrap().to_vec()).unwrap())
            .collect()
    }

    #[tokio::test]
    async fn frames_arrive_in_emit_order() {
        let (channel, stream) = ProgressChannel::open();

        for i in 0..50 {
            channel.emit(ProgressEvent::status(format!("event {i}")));
        }
        channel.emit(ProgressEvent::error("done"));
        drop(channel);

        let decoded = decode_frames(&collect(stream).await);
        assert_eq!(decoded.len(), 51);
        for (i, frame) in decoded.iter().take(50).enumerate() {
            assert_eq!(frame["message"], format!("event {i}"));
        }
        assert_eq!(decoded[50]["type"], "error");
    }

    #[tokio::test]
    async fn ordering_survives_a_producer_on_another_task() {
        let (channel, stream) = ProgressChannel::open();

        let producer = tokio::spawn(async move {
            for i in 0..20 {
                channel.emit(ProgressEvent::status(i.to_string()));
                tokio::task::yield_now().await;
            }
        });

        let raw = collect(stream).await;
        producer.await.unwrap();

        let messages: Vec<_> = decode_frames(&raw)
            .iter()
            .map(|f| f["message"].as_str().unwrap().to_string())
            .collect();
        let expected: Vec<_> = (0..20).map(|i| i.to_string()).collect();
        assert_eq!(messages, expected);
    }

    #[test]
    fn emit_after_reader_dropped_is_swallowed() {
        let (channel, stream) = ProgressChannel::open();
        drop(stream);

        assert!(channel.is_closed());
        channel.emit(ProgressEvent::status("nobody listening"));
        channel.emit(ProgressEvent::status("still nobody"));
    }

    #[test]
    fn dropping_stream_cancels_token() {
        let token = CancellationToken::new();
        let (_channel, stream) = ProgressChannel::open();
        let stream = stream.cancel_on_drop(token.clone());

        assert!(!token.is_cancelled());
        drop(stream);
        assert!(token.is_cancelled());
    }

    #[tokio::test]
    async fn finished_stream_does_not_cancel() {
        let token = CancellationToken::new();
        let (channel, stream) = ProgressChannel::open();
        let stream = stream.cancel_on_drop(token.clone());

        channel.emit(ProgressEvent::status("only"));
        drop(channel);

        let raw = collect(stream).await;
        assert_eq!(decode_frames(&raw).len(), 1);
        assert!(!token.is_cancelled());
    }
}
