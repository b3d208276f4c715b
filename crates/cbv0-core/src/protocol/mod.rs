//! Protocol module containing the CBv0 frame layout, the typed commands, and
//! the codec that ties them together.

pub mod codec;
pub mod crc;
pub mod frame;
pub mod messages;
pub mod sequence;

pub use codec::{decode_command, decode_frame, FrameEncoder, ProtocolError};
pub use frame::{Frame, FrameError, MAGIC, MIN_FRAME_SIZE, VERSION};
pub use messages::*;
pub use sequence::SequenceCounter;
