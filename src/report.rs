pub mod io;
pub mod marketing_leads;
pub mod polars_ext;
pub mod retail_sales;
