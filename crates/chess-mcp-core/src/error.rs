//! Error types for chess-mcp

use thiserror::Error;

/// Result type for chess-mcp operations
pub type Result<T> = std::result::Result<T, ChessError>;

/// chess-mcp error types
#[derive(Debug, Error)]
pub enum ChessError {
    /// Tool arguments do not match the declared input shape
    #[error("Invalid arguments: {0}")]
    InvalidArguments(String),

    /// Move could not be parsed or is not legal in the current position
    #[error("Illegal move '{mv}': {reason}")]
    IllegalMove { mv: String, reason: String },

    /// Opening name not present in the catalog
    #[error("Unknown opening '{name}'. Available openings: {}", available.join(", "))]
    UnknownOpening { name: String, available: Vec<String> },

    /// Game already finished
    #[error("Game over: {0}")]
    GameOver(String),

    /// Analysis requested before any move was played
    #[error("No moves have been played yet")]
    NoMoveHistory,

    /// Resource uri not served
    #[error("Resource not found: {0}")]
    ResourceNotFound(String),

    /// Tool or method name not served
    #[error("Method not found: {0}")]
    MethodNotFound(String),

    /// Recommendation service returned nothing usable
    #[error("Move recommendation unavailable: {0}")]
    RecommendationUnavailable(String),

    /// Player statistics service failed
    #[error("Player statistics unavailable: {0}")]
    StatsUnavailable(String),

    /// FEN could not be parsed or describes an impossible position
    #[error("Invalid position: {0}")]
    InvalidPosition(String),

    /// Transport-level HTTP failure talking to a collaborator
    #[error("HTTP error: {0}")]
    Http(String),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// I/O error on a transport
    #[error("I/O error: {0}")]
    Io(String),
}

impl ChessError {
    /// Stable machine-readable name used in error-tagged tool results
    pub fn kind(&self) -> &'static str {
        match self {
            ChessError::InvalidArguments(_) => "InvalidArguments",
            ChessError::IllegalMove { .. } => "IllegalMove",
            ChessError::UnknownOpening { .. } => "UnknownOpening",
            ChessError::GameOver(_) => "GameOver",
            ChessError::NoMoveHistory => "NoMoveHistory",
            ChessError::ResourceNotFound(_) => "ResourceNotFound",
            ChessError::MethodNotFound(_) => "MethodNotFound",
            ChessError::RecommendationUnavailable(_) => "RecommendationUnavailable",
            ChessError::StatsUnavailable(_) => "StatsUnavailable",
            ChessError::InvalidPosition(_) => "InvalidPosition",
            ChessError::Http(_) => "Http",
            ChessError::Serialization(_) => "Serialization",
            ChessError::Io(_) => "Io",
        }
    }

    /// JSON-RPC error code for this error
    pub fn code(&self) -> i32 {
        match self {
            ChessError::InvalidArguments(_) => error_codes::INVALID_PARAMS,
            ChessError::IllegalMove { .. } => error_codes::ILLEGAL_MOVE,
            ChessError::UnknownOpening { .. } => error_codes::UNKNOWN_OPENING,
            ChessError::GameOver(_) => error_codes::GAME_OVER,
            ChessError::NoMoveHistory => error_codes::NO_MOVE_HISTORY,
            ChessError::ResourceNotFound(_) => error_codes::RESOURCE_NOT_FOUND,
            ChessError::MethodNotFound(_) => error_codes::METHOD_NOT_FOUND,
            ChessError::RecommendationUnavailable(_) | ChessError::StatsUnavailable(_) => {
                error_codes::UPSTREAM_UNAVAILABLE
            }
            _ => error_codes::INTERNAL_ERROR,
        }
    }

    /// Whether this error rejects the request at the protocol level instead
    /// of producing an error-tagged tool result
    pub fn is_protocol_error(&self) -> bool {
        matches!(
            self,
            ChessError::InvalidArguments(_)
                | ChessError::ResourceNotFound(_)
                | ChessError::MethodNotFound(_)
        )
    }
}

impl From<serde_json::Error> for ChessError {
    fn from(err: serde_json::Error) -> Self {
        ChessError::Serialization(err.to_string())
    }
}

impl From<std::io::Error> for ChessError {
    fn from(err: std::io::Error) -> Self {
        ChessError::Io(err.to_string())
    }
}

/// JSON-RPC error codes for chess-mcp
pub mod error_codes {
    pub const PARSE_ERROR: i32 = -32700;
    pub const METHOD_NOT_FOUND: i32 = -32601;
    pub const INVALID_PARAMS: i32 = -32602;
    pub const INTERNAL_ERROR: i32 = -32603;
    pub const RESOURCE_NOT_FOUND: i32 = -32002;

    pub const ILLEGAL_MOVE: i32 = -32010;
    pub const UNKNOWN_OPENING: i32 = -32011;
    pub const GAME_OVER: i32 = -32012;
    pub const NO_MOVE_HISTORY: i32 = -32013;
    pub const UPSTREAM_UNAVAILABLE: i32 = -32014;
}
