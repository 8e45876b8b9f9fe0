//! Route guard command

use storefront_client::{NavigationOutcome, StorefrontContext};

pub fn open(ctx: &StorefrontContext, path: &str) {
    match ctx.navigate(path) {
        NavigationOutcome::NotFound => println!("{path}: no such route"),
        NavigationOutcome::Proceed(matched) => {
            println!("{path}: {}", matched.route.name);
            for (name, value) in &matched.params {
                println!("  {name} = {value}");
            }
        }
        NavigationOutcome::Redirect { from, to } => {
            println!("{path}: {} requires more access, redirected to {to}", from.route.name);
        }
    }
}
