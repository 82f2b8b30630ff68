//! Turning wire-level message drafts into validated submissions.

use crate::{
    domain::{CorrelationId, EmployeeId, MessageContent, MessageSubmission, MessageTarget, RoomId},
    infrastructure::dto::websocket::MessageDraft,
    usecase::DeliveryError,
};

/// Validate a draft.
///
/// `chat_id` wins over `employeeId` when both are present. A missing
/// `sender_id` falls back to `connection_employee` (socket transports only).
pub fn build_submission(
    draft: MessageDraft,
    connection_employee: Option<EmployeeId>,
) -> Result<MessageSubmission, DeliveryError> {
    let invalid = |reason: String| DeliveryError::InvalidPayload(reason);

    let sender_id = match draft.sender_id {
        Some(id) => EmployeeId::new(id).map_err(|e| invalid(e.to_string()))?,
        None => connection_employee.ok_or_else(|| invalid("sender_id is required".to_string()))?,
    };

    let target = match (draft.chat_id, draft.employee_id) {
        (Some(chat_id), _) => {
            MessageTarget::Room(RoomId::new(chat_id).map_err(|e| invalid(e.to_string()))?)
        }
        (None, Some(employee_id)) => MessageTarget::Direct(
            EmployeeId::new(employee_id).map_err(|e| invalid(e.to_string()))?,
        ),
        (None, None) => {
            return Err(invalid(
                "message needs either chat_id or employeeId".to_string(),
            ));
        }
    };

    let content = MessageContent::new(draft.content).map_err(|e| invalid(e.to_string()))?;
    let correlation_id = draft
        .correlation_id
        .map(CorrelationId::new)
        .transpose()
        .map_err(|e| invalid(e.to_string()))?;

    Ok(MessageSubmission {
        target,
        sender_id,
        content,
        correlation_id,
    })
}
