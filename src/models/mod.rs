pub mod bs;

pub use bs::{
    bs_call_price, bs_price, bs_put_price, bs_vega, d1, d2, norm_cdf, norm_pdf, price_bounds,
};
