use contact_store::{Contact, ContactPatch, ContactStore};
use dashmap::DashMap;
use std::time::Duration;

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), contact_store::Error> {
    let path = std::env::temp_dir().join("contact_store_demo_dashmap.json");

    let store = ContactStore::builder(&path)
        .max_latency(Duration::from_millis(50))
        .build_with::<DashMap<String, Vec<Contact>>>()?;

    let c = store.create().await?;
    store
        .update(&c.id, ContactPatch::new().first("Ken").last("Thompson"))
        .await?;

    // the second identical search is served from the latency cache
    for _ in 0..2 {
        let start = std::time::Instant::now();
        let hits = store.list("thom").await?;
        println!("{} hit(s) in {:?}", hits.len(), start.elapsed());
    }

    store.delete(&c.id).await?;
    let _ = std::fs::remove_file(&path);
    Ok(())
}
