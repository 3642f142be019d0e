use grain_life::{BandStripes, Grid, Pattern, PatternSeed, Session, Command};
use std::collections::BTreeSet;

fn alive(grid: &Grid) -> BTreeSet<(u32, u32)> {
    grid.cells()
        .iter()
        .filter(|c| c.is_alive())
        .map(|c| c.position())
        .collect()
}

#[test]
fn l_tromino_in_three_by_three_becomes_block() {
    let mut grid = Grid::new(30, 30, 10).unwrap();
    assert_eq!((grid.x_cells(), grid.y_cells()), (3, 3));

    // Centre plus its top and right neighbours.
    grid.toggle_cell_at(15, 15);
    grid.toggle_cell_at(15, 5);
    grid.toggle_cell_at(25, 15);

    grid.advance_generation();
    assert_eq!(alive(&grid), BTreeSet::from([(1, 0), (2, 0), (1, 1), (2, 1)]));

    // A block is a still life.
    assert_eq!(grid.advance_generation(), 0);
    assert_eq!(alive(&grid), BTreeSet::from([(1, 0), (2, 0), (1, 1), (2, 1)]));
}

#[test]
fn glider_travels_one_diagonal_step_every_four_generations() {
    let seed = PatternSeed { pattern: Pattern::Glider, x: 2, y: 2 };
    let mut grid = Grid::with_seed(72, 72, 6, Box::new(seed)).unwrap();
    let start = alive(&grid);

    for _ in 0..4 {
        grid.advance_generation();
    }

    let shifted: BTreeSet<_> = start.iter().map(|&(x, y)| (x + 1, y + 1)).collect();
    assert_eq!(alive(&grid), shifted);
}

#[test]
fn glider_stops_at_the_border_instead_of_wrapping() {
    let seed = PatternSeed { pattern: Pattern::Glider, x: 2, y: 2 };
    let mut grid = Grid::with_seed(72, 72, 6, Box::new(seed)).unwrap();

    for _ in 0..60 {
        grid.advance_generation();
    }

    assert_eq!(
        alive(&grid),
        BTreeSet::from([(10, 10), (10, 11), (11, 10), (11, 11)])
    );
}

#[test]
fn reseed_restores_the_seed_pattern() {
    let mut grid = Grid::with_seed(60, 60, 6, Box::new(BandStripes::default())).unwrap();
    let seeded = alive(&grid);
    assert!(!seeded.is_empty());

    for _ in 0..5 {
        grid.advance_generation();
    }
    assert_ne!(alive(&grid), seeded);

    grid.reseed();
    assert_eq!(alive(&grid), seeded);
}

#[test]
fn session_drives_a_full_run() {
    let seed = PatternSeed::centered(Pattern::GosperGliderGun, 60, 30);
    let mut grid = Grid::with_seed(360, 180, 6, Box::new(seed)).unwrap();
    let mut session = Session::default();
    let initial = grid.population();

    session.apply(Command::StartOrReseed, &mut grid);
    for _ in 0..30 {
        session.frame(&mut grid);
    }
    assert_eq!(grid.generation(), 30);
    // The gun has fired its first glider by now.
    assert!(grid.population() > initial);

    session.apply(Command::StartOrReseed, &mut grid);
    assert_eq!(grid.population(), initial);
    assert!(!session.is_running());
}
