use contact_store::{ContactPatch, ContactStore};
use std::time::Duration;

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), contact_store::Error> {
    contact_store::logging::init_logging("debug", None)?;
    let path = std::env::temp_dir().join("contact_store_demo_basic.json");
    let store = ContactStore::builder(&path)
        .max_latency(Duration::from_millis(200))
        .build()?;

    for (first, last) in [("Ada", "Lovelace"), ("Alan", "Turing"), ("Grace", "Hopper")] {
        let c = store.create().await?;
        store
            .update(&c.id, ContactPatch::new().first(first).last(last))
            .await?;
    }

    // full list, canonical order
    for c in store.list("").await? {
        println!("{:<8} {}", c.id, c.display_name().unwrap_or_else(|| "No Name".into()));
    }

    // search-as-you-type
    for q in ["l", "lo", "lov"] {
        let hits = store.list(q).await?;
        println!("q={q:<4} -> {} hit(s)", hits.len());
    }

    // favorite toggle as a form would send it
    let ada = store.list("ada").await?.remove(0);
    let ada = store.update_from_form(&ada.id, [("favorite", "true")]).await?;
    println!("{} favorite? {}", ada.id, ada.is_favorite());

    // clean up
    for c in store.list("").await? {
        store.delete(&c.id).await?;
    }
    let _ = std::fs::remove_file(&path);
    Ok(())
}
