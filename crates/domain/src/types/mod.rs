//! Domain types and models
//!
//! Request/response values that flow through the dispatcher, the rich-text
//! helpers, validated write inputs and the read-side projections.

pub mod changelog;
pub mod comment;
pub mod inputs;
pub mod request;
pub mod response;
pub mod rich_text;
pub mod search;
pub mod ticket;
pub mod timestamp;
pub mod transition;

pub use changelog::{ChangeItem, ChangelogEntry};
pub use comment::Comment;
pub use inputs::{
    AssigneeData, AttributeData, CommentData, DescriptionData, StatusData, TicketData,
    TicketDataBuilder,
};
pub use request::{canonical_json, ApiRequest, HttpMethod, QueryParams, QueryValue};
pub use response::{ApiResponse, HeaderMap};
pub use search::{SearchCriteria, SearchResult};
pub use ticket::{TicketDetails, UserRef};
pub use transition::Transition;
