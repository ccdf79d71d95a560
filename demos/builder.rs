use contact_store::{ContactPatch, ContactStore, FlushPolicy};
use std::time::Duration;

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), contact_store::Error> {
    let path = std::env::temp_dir().join("contact_store_demo_builder.json");

    // pretty JSON, background flush every 5 seconds, no fake latency
    let store = ContactStore::builder(&path)
        .pretty(true)
        .policy(FlushPolicy::Async(Duration::from_secs(5)))
        .max_latency(Duration::ZERO)
        .seed(2024)
        .build()?;

    let c = store.create().await?;
    store
        .update(
            &c.id,
            ContactPatch::new()
                .first("Barbara")
                .last("Liskov")
                .github("bliskov")
                .notes("substitution principle"),
        )
        .await?;
    store.flush()?;

    // the file on disk is versioned and indented
    let contents = std::fs::read_to_string(store.local_store().path())?;
    println!("On-disk JSON:\n{contents}");
    println!("\nDebug output: {store:?}");

    drop(store);
    let _ = std::fs::remove_file(&path);
    Ok(())
}
