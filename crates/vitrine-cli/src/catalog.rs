//! Read-only catalog commands, printing the same JSON the HTTP API serves.

use clap::Subcommand;
use vitrine_catalog::{Catalog, ListParams, ListQuery};

use crate::print_json;

/// Sub-commands available under `catalog`.
#[derive(Debug, Subcommand)]
pub enum CatalogCommands {
    /// List one page of a category
    List {
        /// Category or alias (e.g. watches, sari, footwear)
        category: String,
        /// Sort field: price, mrp, discountPercent, title, name, createdAt
        #[arg(long)]
        sort: Option<String>,
        /// asc or desc
        #[arg(long)]
        order: Option<String>,
        #[arg(long)]
        page: Option<u32>,
        #[arg(long)]
        limit: Option<u32>,
        /// Substring matched against title, brand and description
        #[arg(long)]
        search: Option<String>,
    },
    /// Show one product by id
    Show { category: String, id: String },
}

impl CatalogCommands {
    /// The listing request a `list` invocation stands for.
    pub(crate) fn list_query(
        sort: Option<String>,
        order: Option<String>,
        page: Option<u32>,
        limit: Option<u32>,
        search: Option<String>,
    ) -> ListQuery {
        ListQuery::from(ListParams {
            sort,
            order,
            page: page.map(|p| p.to_string()),
            limit: limit.map(|l| l.to_string()),
            search,
            ..ListParams::default()
        })
    }
}

pub(crate) async fn run(command: CatalogCommands, catalog: &Catalog) -> anyhow::Result<()> {
    match command {
        CatalogCommands::List {
            category,
            sort,
            order,
            page,
            limit,
            search,
        } => {
            let query = CatalogCommands::list_query(sort, order, page, limit, search);
            let page = catalog.list_products(&category, &query).await?;
            print_json(&page)
        }
        CatalogCommands::Show { category, id } => {
            let product = catalog.get_product(&category, &id).await?;
            print_json(&product)
        }
    }
}
