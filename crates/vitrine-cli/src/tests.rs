use std::path::PathBuf;

use clap::Parser;
use vitrine_catalog::{SortField, SortOrder};

use super::*;

#[test]
fn parses_db_ping_command() {
    let cli = Cli::try_parse_from(["vitrine-cli", "db", "ping"]).expect("expected valid cli args");

    assert!(matches!(
        cli.command,
        Some(Commands::Db {
            command: DbCommands::Ping
        })
    ));
}

#[test]
fn parses_db_migrate_command() {
    let cli =
        Cli::try_parse_from(["vitrine-cli", "db", "migrate"]).expect("expected valid cli args");

    assert!(matches!(
        cli.command,
        Some(Commands::Db {
            command: DbCommands::Migrate
        })
    ));
}

#[test]
fn parses_db_seed_with_and_without_path() {
    let cli = Cli::try_parse_from(["vitrine-cli", "db", "seed"]).expect("expected valid cli args");
    assert!(matches!(
        cli.command,
        Some(Commands::Db {
            command: DbCommands::Seed { path: None }
        })
    ));

    let cli = Cli::try_parse_from(["vitrine-cli", "db", "seed", "--path", "fixtures/demo.yaml"])
        .expect("expected valid cli args");
    assert!(matches!(
        cli.command,
        Some(Commands::Db {
            command: DbCommands::Seed { path: Some(ref p) }
        }) if p == &PathBuf::from("fixtures/demo.yaml")
    ));
}

#[test]
fn no_command_is_none() {
    let cli = Cli::try_parse_from(["vitrine-cli"]).expect("expected valid cli args");
    assert!(cli.command.is_none());
}

#[test]
fn parses_catalog_list_with_options() {
    let cli = Cli::try_parse_from([
        "vitrine-cli",
        "catalog",
        "list",
        "sari",
        "--sort",
        "price",
        "--order",
        "asc",
        "--page",
        "2",
        "--limit",
        "5",
        "--search",
        "silk",
    ])
    .expect("expected valid cli args");

    let Some(Commands::Catalog {
        command:
            CatalogCommands::List {
                category,
                sort,
                order,
                page,
                limit,
                search,
            },
    }) = cli.command
    else {
        panic!("expected catalog list");
    };
    assert_eq!(category, "sari");

    let query = CatalogCommands::list_query(sort, order, page, limit, search);
    assert_eq!(query.sort, SortField::Price);
    assert_eq!(query.order, SortOrder::Asc);
    assert_eq!(query.page, 2);
    assert_eq!(query.limit, 5);
    assert_eq!(query.filters.search(), Some("silk"));
}

#[test]
fn catalog_list_defaults_match_the_api() {
    let query = CatalogCommands::list_query(None, None, None, Some(500), None);
    assert_eq!(query.page, 1);
    assert_eq!(query.limit, 100);
    assert_eq!(query.sort, SortField::CreatedAt);
    assert_eq!(query.order, SortOrder::Desc);
}

#[test]
fn parses_catalog_show_and_summary() {
    let cli = Cli::try_parse_from(["vitrine-cli", "catalog", "show", "watches", "abc"])
        .expect("expected valid cli args");
    assert!(matches!(
        cli.command,
        Some(Commands::Catalog {
            command: CatalogCommands::Show { ref category, ref id }
        }) if category == "watches" && id == "abc"
    ));

    let cli = Cli::try_parse_from(["vitrine-cli", "summary"]).expect("expected valid cli args");
    assert!(matches!(cli.command, Some(Commands::Summary)));
}

#[test]
fn catalog_list_requires_a_category() {
    assert!(Cli::try_parse_from(["vitrine-cli", "catalog", "list"]).is_err());
}
