use std::time::Duration;

use surmado_client::ReportClient;
use surmado_core::ReportRequest;

use super::{wait::wait_and_report, SubmitArgs};

/// Submit a report and, unless `--no-wait`, wait for it to finish.
///
/// # Errors
///
/// Returns an error if the request is invalid, the service rejects it, or
/// the subsequent wait fails.
pub(crate) async fn run_create(
    client: &ReportClient,
    request: &ReportRequest,
    submit: &SubmitArgs,
    default_timeout: Duration,
) -> anyhow::Result<()> {
    let product = request.product();
    let tier = request.tier();

    let handle = client.create_report(request).await?;
    println!("created {product} report ({tier} tier)");
    println!("report id:    {}", handle.report_id);
    println!("credits used: {}", handle.credits_used);
    println!("the report will also be emailed to {}", request.email());

    if submit.no_wait {
        println!("check progress with: surmado-cli wait {}", handle.report_id);
        return Ok(());
    }

    wait_and_report(client, &handle.report_id, &submit.wait, default_timeout).await
}
