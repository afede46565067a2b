// 1. Traits
pub use crate::report::io::{FromCsv, Report, ReportName, ToCsv, ToJson, ToJsonFile, ToSchema};

// 2. Configuration
pub use crate::config::{GeneratorConfig, SimulationWindow};
pub use crate::io::DataLayout;
pub use crate::profile::{LeadProfiles, RetailProfiles};
pub use crate::sim::StageThresholds;

// 3. Generation & Rendering
pub use crate::dashboard::{LeadDashboard, RetailDashboard};
pub use crate::pipeline::{GenerationManifest, GenerationOutcome, RenderOutcome, generate_datasets, render_dashboards};
pub use crate::sim::{LeadGenerator, RetailGenerator};

// 4. Records & Tables
pub use crate::record::{Lead, LeadId, RetailTransaction, TransactionId};
pub use crate::report::marketing_leads::{LeadCol, MarketingLeads, SourceConversion};
pub use crate::report::retail_sales::{RetailCol, RetailSales};
pub use crate::sim::Stage;

// 5. Insights
pub use crate::insights::{LeadInsights, RetailInsights};

// 6. Errors
pub use crate::error::{BizsimError, BizsimResult, ConfigError, DataError, IoError, RenderError};
