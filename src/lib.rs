// cargo watch -x 'fmt' -x 'run'  // 'run -- 192.168.1.10/24'

pub mod error;
pub mod models;
pub mod output;
pub mod processing;

use error::CalcError;
use output::Report;
use processing::parse_request;

/// Parse `address[/mask]` plus an optional separate mask and build its report.
///
/// # Example
/// ```
/// let report = subnetcalc::calculate("192.168.1.10/24", None).unwrap();
/// assert_eq!(report.subnet.network.to_string(), "192.168.1.0");
/// ```
pub fn calculate(address_arg: &str, mask_arg: Option<&str>) -> Result<Report, CalcError> {
    let request = parse_request(address_arg, mask_arg)?;
    Report::new(&request)
}
