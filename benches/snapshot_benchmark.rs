use criterion::{black_box, criterion_group, criterion_main, Criterion};
use recipe_box::models::{CreatedBy, Recipe, RecipeSource, StoredRecipe};
use recipe_box::sync::SnapshotAssembler;

fn stored_recipe(n: usize) -> StoredRecipe {
    StoredRecipe {
        doc_id: Some(format!("doc-{:05}", n)),
        title: format!("Recipe {}", n),
        summary: "A perfectly ordinary recipe summary of moderate length.".to_string(),
        image_url: "https://example.com/image.jpg".to_string(),
        ingredients: "2 eggs\n1 cup flour\n1 cup milk\na pinch of salt".to_string(),
        instructions: "Mix everything together and cook until done.".to_string(),
        ready_in_minutes: Some(30),
        source: RecipeSource::Firebase,
        created_by: CreatedBy {
            uid: "bench-user".to_string(),
            display_name: "Bench Cook".to_string(),
        },
        created_at: format!("2024-01-01T00:{:02}:{:02}Z", (n / 60) % 60, n % 60),
        updated_at: None,
    }
}

fn benchmark_snapshot_assembly(c: &mut Criterion) {
    let recipes: Vec<Recipe> = (0..1_000)
        .map(|n| Recipe::from_stored(stored_recipe(n)).expect("doc id present"))
        .collect();

    let mut group = c.benchmark_group("snapshot_assembly");

    // Cost of folding a full collection replay into the first snapshot.
    group.bench_function("replay_1000_docs", |b| {
        b.iter(|| {
            let mut assembler = SnapshotAssembler::new();
            for recipe in &recipes {
                assembler.upsert(recipe.id.as_key(), black_box(recipe.clone()));
            }
            assembler.snapshot()
        })
    });

    // Cost of one incremental change against a warm assembler, including
    // the sorted emission the feed performs.
    let mut warm = SnapshotAssembler::new();
    for recipe in &recipes {
        warm.upsert(recipe.id.as_key(), recipe.clone());
    }
    group.bench_function("single_change_emission", |b| {
        b.iter(|| {
            warm.upsert("doc-00500".to_string(), black_box(recipes[500].clone()));
            let mut snapshot = warm.snapshot();
            snapshot.sort_by(|a, b| b.created_at.cmp(&a.created_at));
            snapshot
        })
    });

    group.finish();
}

criterion_group!(benches, benchmark_snapshot_assembly);
criterion_main!(benches);
