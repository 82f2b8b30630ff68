//! UseCase 層
//!
//! ビジネスロジックを実装するレイヤー。
//! UI 層から呼び出され、Domain 層とレジストリを操作します。

pub mod broadcast_presence;
pub mod connect_employee;
pub mod deliver_message;
pub mod disconnect_employee;
pub mod error;
pub mod fetch_history;
pub mod join_room;
pub mod leave_room;
pub mod resolve_recipients;

#[cfg(test)]
pub(crate) mod test_support;

pub use broadcast_presence::PresenceBroadcaster;
pub use connect_employee::ConnectEmployeeUseCase;
pub use deliver_message::{DeliverMessageUseCase, DeliveryReport};
pub use disconnect_employee::DisconnectEmployeeUseCase;
pub use error::{DeliveryError, DisconnectError, MembershipError};
pub use fetch_history::FetchHistoryUseCase;
pub use join_room::JoinRoomUseCase;
pub use leave_room::LeaveRoomUseCase;
pub use resolve_recipients::RecipientResolver;
