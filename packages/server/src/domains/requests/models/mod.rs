pub mod room_request;

pub use room_request::{
    RequestDetails, RequestStatus, RequestType, ResponseDecision, RoomRequest,
    REQUEST_TTL_DAYS, ROOM_RESERVED_MESSAGE,
};
