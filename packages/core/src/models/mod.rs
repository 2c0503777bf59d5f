//! Data Models
//!
//! This module contains the data structures shared by every layer:
//!
//! - `GraphValue` - Scalar or structured node/relationship/path cell
//! - `Row` - Column name → value mapping for one result record
//! - `QuerySpec` / `PageSize` - Validated description of a paginated query
//! - `GraphSchema` / `ConnectorInfo` - Schema sampling and connector metadata

mod query;
mod row;
mod schema;
mod value;

pub use query::{
    apply_window, PageSize, Params, QuerySpec, DEFAULT_PAGE_SIZE, LIMIT_PARAM, SKIP_PARAM,
};
pub use row::Row;
pub use schema::{
    property_type_name, Capabilities, ConnectorInfo, DatabaseDescriptor, DatabaseInfo,
    GraphSchema, LabelSchema, PropertyTypes, RelationshipSchema, MCP_VERSION,
};
pub use value::{GraphNode, GraphPath, GraphRelationship, GraphValue, Properties};
