use anyhow::Result;
use bizsim::{
    format::thousands,
    prelude::*,
    telemetry::init_tracing,
};
use tracing::warn;

fn main() -> Result<()> {
    let _guard = init_tracing("bizsim-dashboards")?;

    let layout = DataLayout::from_env();

    let rule = "=".repeat(60);
    println!("\n{rule}\nCREATING INTERACTIVE DASHBOARDS\n{rule}");

    let rendered = match render_dashboards(&layout) {
        Ok(paths) => paths,
        Err(e) if e.is_missing_input() => {
            warn!(missing = ?layout.missing_inputs(), "Data files not found");
            println!("ERROR: Data files not found. Run 'generate_data' first.");
            return Ok(());
        }
        Err(e) => return Err(e.into()),
    };

    println!("Loaded {} retail transactions", thousands(rendered.retail_rows as u64));
    println!("Loaded {} marketing leads", thousands(rendered.lead_rows as u64));

    println!("\nSaved: {}", rendered.retail_dashboard.display());
    println!("Saved: {}", rendered.lead_dashboard.display());

    println!("\n{rule}\nINTERACTIVE DASHBOARDS CREATED!\n{rule}");
    println!("\nFeatures:");
    println!("- Real-time filtering with instant updates");
    println!("- Click any chart element to filter the dashboard");
    println!("- Dynamic KPIs that update based on filters");
    println!("- Smart insights that highlight important findings");
    println!("- Sortable, searchable data tables");
    println!("- Engaging tooltips and hover effects");

    Ok(())
}
