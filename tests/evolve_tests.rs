use std::sync::LazyLock;

use proptest::prelude::*;

use lifegrid::error::LifeError;
use lifegrid::evolve::Engine;
use lifegrid::grid::Grid;
use lifegrid::partition::{quadrants, remainder_cells};
use lifegrid::seed::{self, BLINKER, BLOCK, GLIDER};

static ENGINE: LazyLock<Engine> = LazyLock::new(|| Engine::new(2).expect("engine"));

fn grid_with(w: usize, h: usize, live: &[(usize, usize)]) -> Grid<bool> {
    let mut g = Grid::new(w, h);
    for &(x, y) in live {
        g.set(x, y, true);
    }
    g
}

fn live_cells(g: &Grid<bool>) -> Vec<(usize, usize)> {
    let mut out = Vec::new();
    for y in 0..g.h {
        for x in 0..g.w {
            if g.get(x, y) {
                out.push((x, y));
            }
        }
    }
    out
}

/// Straight transcription of the neighbor count with `(i + w) % w` wrapping.
fn reference_next(current: &Grid<bool>, x: usize, y: usize) -> bool {
    let (w, h) = (current.w as i64, current.h as i64);
    let (x, y) = (x as i64, y as i64);
    let mut count = 0;
    for i in x - 1..=x + 1 {
        for j in y - 1..=y + 1 {
            if i != x || j != y {
                let (wi, wj) = (((i + w) % w) as usize, ((j + h) % h) as usize);
                if current.get(wi, wj) {
                    count += 1;
                }
            }
        }
    }
    count == 3 || (count == 2 && current.get(x as usize, y as usize))
}

#[test]
fn block_is_still() -> anyhow::Result<()> {
    let mut g = Grid::new(10, 10);
    seed::stamp(&mut g, &BLOCK, 4, 4);
    let next = ENGINE.step(&g)?;
    assert_eq!(next, g);
    Ok(())
}

#[test]
fn blinker_has_period_two() -> anyhow::Result<()> {
    let mut g = Grid::new(10, 10);
    seed::stamp(&mut g, &BLINKER, 4, 5);

    let once = ENGINE.step(&g)?;
    assert_eq!(live_cells(&once), vec![(5, 4), (5, 5), (5, 6)]);

    let twice = ENGINE.step(&once)?;
    assert_eq!(twice, g);
    Ok(())
}

#[test]
fn glider_crosses_the_seam() -> anyhow::Result<()> {
    // 4 generations move a glider one cell down-right; 4 * 8 brings it home on an 8x8 torus.
    let mut g = Grid::new(8, 8);
    seed::stamp(&mut g, &GLIDER, 5, 5);
    let mut cur = g.clone();
    for _ in 0..32 {
        cur = ENGINE.step(&cur)?;
        assert_eq!(cur.alive(), 5);
    }
    assert_eq!(cur, g);
    Ok(())
}

#[test]
fn origin_feeds_the_far_corners() -> anyhow::Result<()> {
    // Two live cells beside each corner make (0,0) the deciding third neighbor.
    let w = 8;
    let h = 6;
    for (cx, cy, others) in [
        (w - 1, h - 1, [(w - 2, h - 1), (w - 1, h - 2)]),
        (w - 1, 0, [(w - 2, 0), (w - 1, 1)]),
        (0, h - 1, [(1, h - 1), (0, h - 2)]),
    ] {
        let with_origin = grid_with(w, h, &[(0, 0), others[0], others[1]]);
        let without = grid_with(w, h, &others);
        assert!(ENGINE.step(&with_origin)?.get(cx, cy), "({cx}, {cy}) should be born");
        assert!(!ENGINE.step(&without)?.get(cx, cy));
    }
    Ok(())
}

#[test]
fn odd_sides_keep_stale_remainder() -> anyhow::Result<()> {
    let current = Grid::new(5, 5);
    let mut next = Grid::from_cells(5, 5, vec![true; 25])?;
    ENGINE.evolve(&current, &mut next)?;

    let stale = remainder_cells(5, 5, 2);
    for y in 0..5 {
        for x in 0..5 {
            assert_eq!(next.get(x, y), stale.contains(&(x, y)), "({x}, {y})");
        }
    }
    Ok(())
}

#[test]
fn odd_sides_remainder_ignores_the_rule() -> anyhow::Result<()> {
    // Horizontal blinker centered on the last column; the rule would turn it vertical there.
    let mut current = Grid::new(5, 5);
    seed::stamp(&mut current, &BLINKER, 3, 2);
    for y in 1..=3 {
        assert!(reference_next(&current, 4, y));
    }

    let mut next = Grid::new(5, 5);
    ENGINE.evolve(&current, &mut next)?;
    assert_eq!(next.alive(), 0);
    Ok(())
}

#[test]
fn four_workers_cover_an_even_grid() -> anyhow::Result<()> {
    let mut current = Grid::new(12, 8);
    seed::random_fill(&mut current, 0.4, 9)?;
    let next = ENGINE.step(&current)?;
    for y in 0..8 {
        for x in 0..12 {
            assert_eq!(next.get(x, y), reference_next(&current, x, y));
        }
    }
    Ok(())
}

#[test]
fn wider_split_matches_default() -> anyhow::Result<()> {
    let mut current = Grid::new(24, 24);
    seed::random_fill(&mut current, 0.3, 5)?;
    let three = Engine::new(3)?;
    assert_eq!(three.step(&current)?, ENGINE.step(&current)?);
    Ok(())
}

#[test]
fn repeated_calls_agree() -> anyhow::Result<()> {
    let mut current = Grid::new(30, 30);
    seed::random_fill(&mut current, 0.1, 42)?;
    let first = ENGINE.step(&current)?;
    for _ in 0..5 {
        assert_eq!(ENGINE.step(&current)?, first);
    }
    Ok(())
}

#[test]
fn zero_dimension_fails_before_writing() {
    let current = Grid::<bool>::new(0, 4);
    let mut next = Grid::new(0, 4);
    assert!(matches!(
        ENGINE.evolve(&current, &mut next),
        Err(LifeError::InvalidDimension { width: 0, height: 4 })
    ));
}

#[test]
fn corrupt_storage_is_an_invalid_dimension() {
    let current = Grid {
        data: vec![false; 5],
        w: 3,
        h: 3,
    };
    assert!(matches!(ENGINE.step(&current), Err(LifeError::InvalidDimension { .. })));
}

#[test]
fn mismatched_next_is_untouched() {
    let current = grid_with(4, 4, &[(1, 1), (1, 2), (2, 1)]);
    let mut next = Grid::from_cells(4, 2, vec![true; 8]).unwrap();
    let err = ENGINE.evolve(&current, &mut next).unwrap_err();
    assert!(matches!(
        err,
        LifeError::DimensionMismatch {
            expected: (4, 4),
            found: (4, 2)
        }
    ));
    assert!(next.data.iter().all(|&c| c));
}

fn field() -> impl Strategy<Value = (Grid<bool>, Grid<bool>)> {
    (1usize..14, 1usize..14).prop_flat_map(|(w, h)| {
        (
            prop::collection::vec(any::<bool>(), w * h),
            prop::collection::vec(any::<bool>(), w * h),
        )
            .prop_map(move |(cur, next)| {
                (
                    Grid { data: cur, w, h },
                    Grid { data: next, w, h },
                )
            })
    })
}

fn even_field() -> impl Strategy<Value = Grid<bool>> {
    (1usize..7, 1usize..7).prop_flat_map(|(hw, hh)| {
        let (w, h) = (2 * hw, 2 * hh);
        prop::collection::vec(any::<bool>(), w * h).prop_map(move |data| Grid { data, w, h })
    })
}

proptest! {
    #[test]
    fn quadrant_cells_follow_the_rule_and_the_rest_stay_stale((current, before) in field()) {
        let mut next = before.clone();
        ENGINE.evolve(&current, &mut next).unwrap();

        let quads = quadrants(current.w, current.h, 2);
        for y in 0..current.h {
            for x in 0..current.w {
                if quads.iter().any(|q| q.contains(x, y)) {
                    prop_assert_eq!(next.get(x, y), reference_next(&current, x, y));
                } else {
                    prop_assert_eq!(next.get(x, y), before.get(x, y));
                }
            }
        }
    }

    #[test]
    fn translation_on_the_torus_commutes(current in even_field(), dx in 0usize..14, dy in 0usize..14) {
        let (w, h) = current.dims();
        let shift = |g: &Grid<bool>| {
            let mut out = Grid::new(w, h);
            for y in 0..h {
                for x in 0..w {
                    out.set((x + dx) % w, (y + dy) % h, g.get(x, y));
                }
            }
            out
        };
        let a = shift(&ENGINE.step(&current).unwrap());
        let b = ENGINE.step(&shift(&current)).unwrap();
        prop_assert_eq!(a, b);
    }
}
