use criterion::{Criterion, criterion_group, criterion_main};
use std::hint::black_box;
use std::time::Duration;
use sudoku_sat::sat::branching::BranchingDpll;
use sudoku_sat::sat::dpll::Dpll;
use sudoku_sat::sat::solver::Solver;
use sudoku_sat::sudoku::encoder::encode;
use sudoku_sat::sudoku::puzzle::{Clue, Puzzle, Rectangle, SumConstraint};

fn four_by_four() -> Puzzle {
    Puzzle::new(
        Rectangle::new(2, 2),
        vec![Clue::new(0, 0, 1), Clue::new(3, 3, 1)],
        vec![SumConstraint::new(1, 1, 1, 2, 5)],
    )
}

fn six_by_six() -> Puzzle {
    Puzzle::new(
        Rectangle::new(2, 3),
        vec![Clue::new(0, 0, 1), Clue::new(2, 3, 5), Clue::new(5, 5, 2)],
        vec![
            SumConstraint::new(1, 1, 1, 2, 11),
            SumConstraint::new(4, 0, 5, 0, 9),
        ],
    )
}

fn bench_encode(c: &mut Criterion) {
    let mut group = c.benchmark_group("encode");
    for (name, puzzle) in [
        ("4x4", four_by_four()),
        ("6x6", six_by_six()),
        ("9x9", Puzzle::new(Rectangle::new(3, 3), vec![], vec![])),
    ] {
        group.bench_function(name, |b| b.iter(|| black_box(encode(&puzzle))));
    }
    group.finish();
}

fn bench_solvers(c: &mut Criterion) {
    for (name, puzzle) in [("4x4", four_by_four()), ("6x6", six_by_six())] {
        let Ok((variables, cnf)) = encode(&puzzle) else {
            eprintln!("Failed to encode {name}");
            continue;
        };

        let mut group = c.benchmark_group(format!("solve {name}"));
        group.measurement_time(Duration::from_secs(10));

        group.bench_function("dpll (trail)", |b| {
            b.iter(|| {
                let mut solver = Dpll::new(variables.clone(), cnf.clone()).unwrap();
                black_box(solver.solve());
            })
        });

        group.bench_function("dpll (branching)", |b| {
            b.iter(|| {
                let mut solver = BranchingDpll::new(variables.clone(), cnf.clone()).unwrap();
                black_box(solver.solve());
            })
        });

        group.finish();
    }
}

criterion_group!(benches, bench_encode, bench_solvers);
criterion_main!(benches);
