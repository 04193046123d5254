use serde::{Deserialize, Serialize};

use crate::models::{
    MessageDetail, NewMessage, ReadReceipt, ReceivedMessage, SentMessage, UserDetail, UserSummary,
};

// -- Auth --

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RegisterRequest {
    pub username: String,
    pub password: String,
    pub first_name: String,
    pub last_name: String,
    pub phone: String,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct TokenResponse {
    pub token: String,
}

// -- Users --

#[derive(Debug, Serialize)]
pub struct UserListResponse {
    pub users: Vec<UserSummary>,
}

#[derive(Debug, Serialize)]
pub struct UserResponse {
    pub user: UserDetail,
}

#[derive(Debug, Serialize)]
pub struct SentMessagesResponse {
    pub messages: Vec<SentMessage>,
}

#[derive(Debug, Serialize)]
pub struct ReceivedMessagesResponse {
    pub messages: Vec<ReceivedMessage>,
}

// -- Messages --

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SendMessageRequest {
    pub to_username: String,
    pub body: String,
}

#[derive(Debug, Serialize)]
pub struct NewMessageResponse {
    pub message: NewMessage,
}

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: MessageDetail,
}

#[derive(Debug, Serialize)]
pub struct ReadReceiptResponse {
    pub message: ReadReceipt,
}
