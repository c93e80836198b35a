//! Cart filling and checkout.

use std::collections::HashSet;

use anyhow::{bail, Context as _, Result};
use catalog_commerce::{AccountId, CartOutcome, ItemId, MAX_QUANTITY_PER_LINE};
use catalog_data::{Dependency, NavigationTarget, Notification, RemoteError};
use catalog_widget::{CatalogController, CheckoutOutcome};
use serde::Serialize;

use super::CheckoutArgs;
use crate::context::Context;
use crate::session::Session;

/// Run the checkout command.
pub async fn run(args: CheckoutArgs, ctx: &Context) -> Result<()> {
    let lines = args
        .items
        .iter()
        .map(|line| parse_line(line))
        .collect::<Result<Vec<_>>>()?;

    let session = Session::open(ctx, args.catalog.as_deref())?;
    session.connect().await;
    let controller = &session.controller;

    let account = args.account.or_else(|| ctx.config.fixtures.account.clone());
    controller
        .on_account_resolved(account.map(AccountId::new))
        .await;

    for warning in fill_cart(controller, &lines) {
        ctx.output.warn(&warning);
    }
    ctx.output.debug(&controller.cart_label());

    if let Some(message) = args.fail {
        session
            .purchases
            .push_outcome(Err(RemoteError::backend(Dependency::Purchase, message)));
    }

    let outcome = controller.checkout().await;
    let report = CheckoutReport {
        notifications: session.notifier.notifications(),
        navigation: session.navigator.targets(),
        cart_label: controller.cart_label(),
        outcome,
    };

    if ctx.output.is_json() {
        ctx.output.json(&report);
    } else {
        print_report(ctx, &report);
    }

    match report.outcome {
        CheckoutOutcome::Completed { .. } => Ok(()),
        CheckoutOutcome::Failed { message } => bail!("Checkout failed: {}", message),
        other => bail!("Checkout not submitted: {:?}", other),
    }
}

#[derive(Serialize)]
struct CheckoutReport {
    outcome: CheckoutOutcome,
    notifications: Vec<Notification>,
    navigation: Vec<NavigationTarget>,
    cart_label: String,
}

fn print_report(ctx: &Context, report: &CheckoutReport) {
    ctx.output.header("Checkout");
    for notification in &report.notifications {
        ctx.output.notification(notification);
    }
    for target in &report.navigation {
        if let NavigationTarget::RecordPage { record_id, .. } = target {
            ctx.output.success(&format!("Navigated to purchase {}", record_id));
        }
    }
    ctx.output.kv("cart", &report.cart_label);
}

/// Add each requested line to the cart, one unit at a time. Returns a
/// warning for every line that could not be added in full.
fn fill_cart(controller: &CatalogController, lines: &[(String, u32)]) -> Vec<String> {
    let on_page: HashSet<ItemId> = controller.items().into_iter().map(|item| item.id).collect();
    let mut warnings = Vec::new();
    for (item_id, qty) in lines {
        let item_id = ItemId::new(item_id.as_str());
        if !on_page.contains(&item_id) {
            warnings.push(format!("{} is not on the current page; skipped", item_id));
            continue;
        }
        for added in 0..*qty {
            if controller.add_to_cart(item_id.clone()) == CartOutcome::Ignored {
                warnings.push(format!(
                    "{} reached the limit of {} per line; {} of {} added",
                    item_id, MAX_QUANTITY_PER_LINE, added, qty
                ));
                break;
            }
        }
    }
    warnings
}

/// Parse `ID` or `ID:QTY`.
fn parse_line(line: &str) -> Result<(String, u32)> {
    let (id, qty) = match line.split_once(':') {
        Some((id, qty)) => {
            let qty: u32 = qty
                .trim()
                .parse()
                .with_context(|| format!("Invalid quantity in '{}'", line))?;
            (id.trim(), qty)
        }
        None => (line.trim(), 1),
    };
    if id.is_empty() || qty == 0 {
        bail!("Invalid item '{}': expected ID or ID:QTY with QTY >= 1", line);
    }
    Ok((id.to_string(), qty))
}
