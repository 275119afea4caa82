use breakroll_core::draw::draw;
use breakroll_core::{
    BreakSession, Catalog, Exhausted, Item, LayoutPlacer, MemorySlot, ReconciledState,
    ReservedBlock,
};
use rand::SeedableRng;
use rand::rngs::SmallRng;
use rand_chacha::ChaCha20Rng;
use std::collections::{HashMap, HashSet};

fn catalog_of(ids: &[&str]) -> Catalog {
    Catalog::new(
        ids.iter()
            .map(|id| Item::new(id, &id.to_uppercase(), &id.to_uppercase()))
            .collect(),
    )
    .unwrap()
}

fn taken_ids(state: &ReconciledState) -> HashSet<String> {
    state
        .items
        .iter()
        .filter(|entry| entry.is_taken())
        .map(|entry| entry.item.id.clone())
        .collect()
}

#[test]
fn exclusion_holds_across_full_runs() {
    for seed in [1_u64, 2, 3, 0xBEEF, 0x00C0_FFEE] {
        let catalog = Catalog::builtin();
        let mut state = ReconciledState::fresh(&catalog);
        let mut rng = ChaCha20Rng::seed_from_u64(seed);
        let mut previous = HashSet::new();
        let mut drawn = HashSet::new();

        for turn in 0..catalog.len() {
            let record = draw(&mut state, &format!("viewer-{turn}"), 0, &mut rng).unwrap();
            assert!(drawn.insert(record.item_id.clone()), "{} drawn twice", record.item_id);

            let now = taken_ids(&state);
            assert!(previous.is_subset(&now));
            assert_eq!(now.len(), previous.len() + 1);
            previous = now;
        }

        assert_eq!(draw(&mut state, "late", 0, &mut rng), Err(Exhausted));
        assert_eq!(state.history.len(), catalog.len());
        assert_eq!(drawn.len(), catalog.len());
    }
}

#[test]
fn two_item_catalog_exhausts_after_two_draws() {
    let slot = MemorySlot::new();
    let mut session = BreakSession::open_seeded(catalog_of(&["p", "q"]), slot.clone(), 77);
    session.draw("one").unwrap();
    session.draw("two").unwrap();
    let persisted = slot.payload();

    assert_eq!(session.draw("X"), Err(Exhausted));
    assert_eq!(session.state().history.len(), 2);
    assert_eq!(slot.payload(), persisted);
}

#[test]
fn draws_are_uniform_over_available_items() {
    const TRIALS: usize = 30_000;
    const TOLERANCE: f64 = 0.02;

    let catalog = catalog_of(&["r", "s", "t"]);
    let mut rng = SmallRng::seed_from_u64(0x5EED);
    let mut counts: HashMap<String, usize> = HashMap::new();
    for _ in 0..TRIALS {
        let mut state = ReconciledState::fresh(&catalog);
        let record = draw(&mut state, "trial", 0, &mut rng).unwrap();
        *counts.entry(record.item_id).or_default() += 1;
    }

    assert_eq!(counts.len(), 3);
    for (id, count) in counts {
        #[allow(clippy::cast_precision_loss)]
        let freq = count as f64 / TRIALS as f64;
        assert!(
            (freq - 1.0 / 3.0).abs() < TOLERANCE,
            "{id} drawn with frequency {freq:.4}"
        );
    }
}

#[test]
fn placement_fills_rows_around_the_banner() {
    let placer = LayoutPlacer::new(10, 4, ReservedBlock::centered(10, 1, 2, 4)).unwrap();
    assert_eq!(placer.reserved_indices(), vec![13, 14, 15, 16, 23, 24, 25, 26]);

    let items: Vec<u32> = (0..33).collect();
    let placements = placer.place(&items);
    assert_eq!(placements.len(), 32);

    let shown = |i: usize| {
        let cell = placements[i].cell;
        (cell.display_row(), cell.display_column())
    };
    assert_eq!(shown(0), (1, 1));
    assert_eq!(shown(9), (1, 10));
    assert_eq!(shown(10), (2, 1));
    assert_eq!(*placements[31].item, 31);
    assert!(placements.iter().all(|p| *p.item != 32));

    let again = placer.place(&items);
    assert_eq!(placements, again);
}
