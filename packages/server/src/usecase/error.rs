//! UseCase 層のエラー定義

use thiserror::Error;

use crate::domain::{ConnectionId, RepositoryError};

/// メッセージ配信のエラー
///
/// 送信者への ack にだけ現れる。個々の接続への書き込み失敗はここに含まれない。
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DeliveryError {
    /// 宛先を特定できない、または内容が不正なメッセージ
    #[error("invalid payload: {0}")]
    InvalidPayload(String),

    /// 永続化に失敗したため配信しなかった
    #[error("persistence failed: {0}")]
    PersistenceFailure(#[from] RepositoryError),
}

/// ルーム参加のエラー
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum MembershipError {
    #[error("connection {0} is not registered")]
    UnknownConnection(ConnectionId),
}

/// 切断処理のエラー
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DisconnectError {
    /// 既に削除済みの接続
    #[error("connection {0} is not registered")]
    UnknownConnection(ConnectionId),
}
