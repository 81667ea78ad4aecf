mod endpoint;
mod header;
mod packet;
mod tracking;

pub use endpoint::{Endpoint, NetworkStats, Received};
pub use header::{
    sequence_greater_than, PacketHeader, HEADER_BITS, PROTOCOL_MAGIC, PROTOCOL_VERSION,
};
pub use packet::{Packet, PacketError, MAX_PACKET_SIZE};
pub use tracking::{AckTracker, PendingPacket, ReceiveTracker};
