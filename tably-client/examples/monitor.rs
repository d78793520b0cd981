use tably_client::client::TablyClient;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    println!("Tably Order Monitor");
    println!("===================\n");

    // Connect to the Tably server
    let (mut client, mut orders) = TablyClient::connect("127.0.0.1:3000").await?;
    println!("Connected to Tably server at 127.0.0.1:3000\n");

    loop {
        println!("--- Active Orders ({}) ---", orders.len());
        for order in &orders {
            println!(
                "  [{}] {} | {} item(s), total {:.2}",
                order.id,
                order.table,
                order.items.len(),
                order.total_price
            );
            for item in &order.items {
                println!("      {} x{} @ {:.2}", item.name, item.quantity, item.price);
            }
        }
        println!();

        // Block until the hub pushes the next snapshot
        orders = client.next_snapshot().await?;
    }
}
