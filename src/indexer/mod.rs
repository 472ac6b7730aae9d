pub mod records;
pub mod subgraph_client;

pub use records::{RawSalesStrategy, TokenSalesData};
pub use subgraph_client::{SaleStrategySource, SubgraphClient};
