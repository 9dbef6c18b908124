use clap::Args;
use coffeepulse_core::{Config, WaterPlan};

#[derive(Args)]
pub struct CalcArgs {
    /// Coffee dose in grams (defaults to config)
    #[arg(long)]
    coffee: Option<f64>,
    /// Water-to-coffee ratio (defaults to config)
    #[arg(long)]
    ratio: Option<f64>,
    /// Print as JSON
    #[arg(long)]
    json: bool,
}

pub fn run(args: CalcArgs) -> Result<(), Box<dyn std::error::Error>> {
    let mut config = Config::load_or_default();
    if let Some(coffee) = args.coffee {
        config.recipe.coffee_weight = coffee;
    }
    if let Some(ratio) = args.ratio {
        config.recipe.water_ratio = ratio;
    }
    let brew = config.brew_config()?;
    let plan = WaterPlan::for_config(&brew);

    if args.json {
        println!("{}", serde_json::to_string_pretty(&plan)?);
    } else {
        println!("coffee   {}g @ 1:{}", brew.coffee_weight, brew.water_ratio);
        println!("total    {}g", plan.total_water);
        println!("bloom    {}g", plan.bloom_water);
        println!("main     {}g", plan.main_pour_water);
    }
    Ok(())
}
