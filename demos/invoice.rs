use bpay_client::{
    client::{BpayClient, DefaultBpayClient},
    models::{GroupCreateRequest, GroupListRequest},
    ClientConfig,
};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Reads BPAY_ENDPOINT, BPAY_USERNAME and BPAY_PASSWORD
    let config = ClientConfig::from_env()?;
    let client = DefaultBpayClient::with_config(config)?;
    let customer_id = 1;

    for region in client.constant_aimag_hot().await? {
        println!("Region: id={}, name={}", region.id, region.name);
    }

    client.group_create(&GroupCreateRequest { name: "Block A".to_string() }, customer_id).await?;
    let request = GroupListRequest { page_no: 1, per_page: 10, ..Default::default() };
    let groups = client.group_list(&request, customer_id).await?;
    for group in groups.data {
        let invoice = client.invoice_group_create(&group.id.to_string(), customer_id).await?;
        println!("Group {}: invoice={}, total={}", group.name, invoice.id, invoice.total_amount);
    }
    Ok(())
}
