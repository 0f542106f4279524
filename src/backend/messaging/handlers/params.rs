//! Query-string parameters of the messaging endpoints

use serde::Deserialize;

use crate::shared::ids::optional_id;

/// `?userId=`
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserQuery {
    #[serde(default, deserialize_with = "optional_id")]
    pub user_id: Option<i64>,
}

/// `?chatId=&limit=&userId=`
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListMessagesQuery {
    #[serde(default, deserialize_with = "optional_id")]
    pub chat_id: Option<i64>,
    #[serde(default)]
    pub limit: Option<i64>,
    /// Viewer whose incoming messages get marked read
    #[serde(default, deserialize_with = "optional_id")]
    pub user_id: Option<i64>,
}
