//! Catalog browsing.

use anyhow::{bail, Result};
use catalog_widget::{FetchOutcome, WidgetView};

use super::BrowseArgs;
use crate::context::Context;
use crate::session::Session;

/// Run the browse command.
pub async fn run(args: BrowseArgs, ctx: &Context) -> Result<()> {
    if args.page == 0 {
        bail!("--page starts at 1");
    }

    let session = Session::open(ctx, args.catalog.as_deref())?;
    session.connect().await;
    let controller = &session.controller;

    if let Some(size) = args.page_size {
        report(ctx, "page size", controller.set_page_size(size).outcome().await);
    }
    if !args.types.is_empty() {
        report(ctx, "types", controller.set_types(args.types).outcome().await);
    }
    if !args.families.is_empty() {
        report(ctx, "families", controller.set_families(args.families).outcome().await);
    }
    if let Some(search) = args.search {
        ctx.output.debug(&format!(
            "Waiting {}ms for the search to settle",
            controller.config().debounce_ms
        ));
        report(ctx, "search", controller.set_search_key(search).outcome().await);
    }
    for _ in 1..args.page {
        report(ctx, "page", controller.next_page().outcome().await);
    }

    let view = controller.view();
    if ctx.output.is_json() {
        ctx.output.json(&view);
    } else {
        print_view(ctx, &view);
    }

    if let Some(error) = view.error {
        bail!("Search failed: {}", error);
    }
    Ok(())
}

fn report(ctx: &Context, step: &str, outcome: FetchOutcome) {
    ctx.output.debug(&format!("{}: {:?}", step, outcome));
}

fn print_view(ctx: &Context, view: &WidgetView) {
    let filter = &view.filter;
    let page = filter.offset() / filter.limit() + 1;
    ctx.output.header(&format!("Catalog (page {})", page));

    if view.items.is_empty() {
        ctx.output.info("No items match the current filter.");
        return;
    }

    let widths = [16, 24, 8, 10];
    ctx.output.table_row(&["ID", "NAME", "TYPE", "FAMILY"], &widths);
    for card in &view.items {
        let item = &card.item;
        ctx.output.table_row(
            &[
                item.id.as_str(),
                item.name.as_str(),
                item.item_type.as_deref().unwrap_or("-"),
                item.family.as_deref().unwrap_or("-"),
            ],
            &widths,
        );
    }
    ctx.output.info(&format!("{} item(s)", view.items.len()));
}
