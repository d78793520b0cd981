use anyhow::Result;
use tably_client::TablyClient;
use tably_protocol::OrderItem;

#[tokio::main]
async fn main() -> Result<()> {
    let (mut client, active) = TablyClient::connect("127.0.0.1:3000").await?;
    println!("{} active order(s) on connect", active.len());

    let order = client
        .place_order(
            vec![OrderItem {
                id: "i1".into(),
                name: "Wings".into(),
                price: 9.5,
                quantity: 2,
            }],
            "Table 4",
        )
        .await?;
    println!("placed order {}", order.id);

    let orders = client.next_snapshot().await?;
    println!("now {} active order(s)", orders.len());

    Ok(())
}
