use postcard::experimental::max_size::MaxSize;

use crate::event::KeyEvent;
use crate::state::ConnectionStateCell;
use crate::transport::TransportWriter;

/// Largest COBS framed postcard record of a [`KeyEvent`], including the trailing zero
pub const MAX_ENCODED_EVENT_LEN: usize = KeyEvent::POSTCARD_MAX_SIZE + KeyEvent::POSTCARD_MAX_SIZE / 254 + 2;

/// Turns a key event into the bytes sent to the host.
///
/// This is where a keycode mapping plugs in.
pub trait EventEncoder {
    type Error;

    /// Encode `event` into `buf`, return the used part of `buf`
    fn encode<'b>(
        &mut self,
        event: &KeyEvent,
        buf: &'b mut [u8; MAX_ENCODED_EVENT_LEN],
    ) -> Result<&'b [u8], Self::Error>;
}

/// Encodes events as COBS framed postcard records, so the host can split a byte stream on zeros.
#[derive(Clone, Copy, Debug, Default)]
pub struct PostcardEncoder;

impl EventEncoder for PostcardEncoder {
    type Error = postcard::Error;

    fn encode<'b>(
        &mut self,
        event: &KeyEvent,
        buf: &'b mut [u8; MAX_ENCODED_EVENT_LEN],
    ) -> Result<&'b [u8], postcard::Error> {
        postcard::to_slice_cobs(event, buf).map(|bytes| &*bytes)
    }
}

/// Outcome of one [`Dispatcher::dispatch`] call
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct DispatchSummary {
    /// Events handed to the transport
    pub sent: usize,
    /// Events dropped because no session was active
    pub dropped: usize,
    /// Events lost to encoding or send errors
    pub failed: usize,
}

/// Forwards key events to the connected central.
///
/// Events are never buffered: while the connection state isn't `Connected`
/// they are dropped.
pub struct Dispatcher<'a, W: TransportWriter, E: EventEncoder = PostcardEncoder> {
    writer: W,
    encoder: E,
    state: &'a ConnectionStateCell,
}

impl<'a, W: TransportWriter> Dispatcher<'a, W, PostcardEncoder> {
    pub fn new(writer: W, state: &'a ConnectionStateCell) -> Self {
        Self::with_encoder(writer, PostcardEncoder, state)
    }
}

impl<'a, W: TransportWriter, E: EventEncoder> Dispatcher<'a, W, E> {
    pub fn with_encoder(writer: W, encoder: E, state: &'a ConnectionStateCell) -> Self {
        Self { writer, encoder, state }
    }

    /// Send `events` in order.
    ///
    /// The connection state is checked before every event, a disconnection in
    /// the middle of a batch drops the rest of it.
    pub async fn dispatch(&mut self, events: &[KeyEvent]) -> DispatchSummary {
        let mut summary = DispatchSummary::default();
        let mut buf = [0u8; MAX_ENCODED_EVENT_LEN];
        for (i, event) in events.iter().enumerate() {
            if !self.state.is_connected() {
                summary.dropped = events.len() - i;
                debug!("Not connected, dropping {} key events", summary.dropped);
                break;
            }
            let bytes = match self.encoder.encode(event, &mut buf) {
                Ok(bytes) => bytes,
                Err(_) => {
                    error!("Failed to encode key event {:?}", event);
                    summary.failed += 1;
                    continue;
                }
            };
            match self.writer.send(bytes).await {
                Ok(_) => summary.sent += 1,
                Err(_) => {
                    warn!("Failed to send key event {:?}", event);
                    summary.failed += 1;
                }
            }
        }
        summary
    }

    pub fn writer(&self) -> &W {
        &self.writer
    }

    pub fn writer_mut(&mut self) -> &mut W {
        &mut self.writer
    }
}
