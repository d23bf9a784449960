pub mod event;

/// Bearer トークンとして受け渡す不透明な文字列
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccessToken(pub String);
