// Copyright 2026 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Tests for the `trellis_solver` crate.
//!
//! These drive whole scenarios end to end: chain construction and replay,
//! competing strengths, bidirectional scale projections, and the recovery
//! paths (retraction, cycles, unsatisfiable required constraints).

use trellis_solver::{
    ConstraintId, ConstraintKind, Diagnostic, DiagnosticLog, Direction, Solver, Strength,
    VariableId,
};

/// Every satisfied constraint must be the registered determiner of its
/// output, and nothing else may claim that output.
fn assert_consistent(solver: &Solver) {
    let graph = solver.graph();
    for (id, variable) in graph.variables() {
        let claimants: Vec<ConstraintId> = graph
            .constraints()
            .filter(|&(_, c)| c.is_satisfied() && c.output() == id)
            .map(|(c, _)| c)
            .collect();
        match variable.determined_by() {
            Some(determiner) => assert_eq!(
                claimants,
                vec![determiner],
                "{id} must be claimed exactly by its determiner"
            ),
            None => assert!(
                claimants.is_empty(),
                "{id} is undetermined but has claimants"
            ),
        }
    }
}

fn build_chain(solver: &mut Solver, length: usize) -> (Vec<VariableId>, Vec<ConstraintId>) {
    let variables: Vec<VariableId> = (0..length)
        .map(|i| solver.add_variable(format!("v{i}"), 0.0))
        .collect();
    let equalities: Vec<ConstraintId> = variables
        .windows(2)
        .map(|pair| solver.add_equality(pair[0], pair[1], Strength::Required))
        .collect();
    (variables, equalities)
}

#[test]
fn chains_replan_around_stays_and_edits() {
    let mut solver = Solver::new();
    let (variables, equalities) = build_chain(&mut solver, 4);
    solver.add_stay(variables[3], Strength::StrongDefault);
    assert_consistent(&solver);

    // The stay anchors the tail, so the whole chain points at it.
    for &eq in &equalities {
        assert_eq!(solver.constraint(eq).direction(), Direction::Backward);
    }

    // An edit on the head outranks the tail's stay and turns the chain
    // around again.
    let mut session = solver.begin_edit(variables[0], Strength::Preferred);
    assert_eq!(session.plan().len(), 4);
    for value in [42.0, -3.5, 0.25] {
        session.set_value(value);
        assert_eq!(session.solver().value(variables[3]), value);
    }
    for &eq in &equalities {
        assert_eq!(session.solver().constraint(eq).direction(), Direction::Forward);
    }
    session.finish();

    assert_eq!(solver.value(variables[3]), 0.25);
    assert_consistent(&solver);
}

#[test]
fn hundred_value_replay_through_one_plan() {
    let mut solver = Solver::new();
    let (variables, _) = build_chain(&mut solver, 10);
    let first = variables[0];
    let last = *variables.last().unwrap();
    solver.add_stay(last, Strength::StrongDefault);

    let mut session = solver.begin_edit(first, Strength::Preferred);
    for i in 0..100 {
        session.set_value(f64::from(i));
        assert_eq!(session.solver().value(last), f64::from(i));
    }
    session.finish();
    assert_consistent(&solver);
}

#[test]
fn weaker_edits_lose_to_a_stronger_stay() {
    let mut solver = Solver::new();
    let (variables, _) = build_chain(&mut solver, 4);
    solver.add_stay(variables[0], Strength::StrongPreferred);
    assert_consistent(&solver);

    let mut session = solver.begin_edit(variables[0], Strength::Preferred);
    assert!(!session.is_active());
    assert!(session.plan().is_empty());
    session.set_value(99.0);
    session.finish();

    // The raw write landed on the edited variable, but nothing propagated.
    assert_eq!(solver.value(variables[0]), 99.0);
    for &v in &variables[1..] {
        assert_eq!(solver.value(v), 0.0);
    }
    assert_consistent(&solver);
}

#[test]
fn scale_constraints_solve_in_both_directions() {
    let mut solver = Solver::new();
    let src = solver.add_variable("src", 17.0);
    let scale = solver.add_variable("scale", 10.0);
    let offset = solver.add_variable("offset", 1000.0);
    let dst = solver.add_variable("dst", 0.0);
    solver.add_stay(src, Strength::Normal);
    let projection = solver.add_scale(src, scale, offset, dst, Strength::Required);

    // Forward at construction: the destination follows the source eagerly.
    assert_eq!(solver.value(dst), 1170.0);
    assert_eq!(solver.constraint(projection).direction(), Direction::Forward);

    // Editing the destination turns the relation around.
    let mut session = solver.begin_edit(dst, Strength::Preferred);
    session.set_value(1050.0);
    assert_eq!(
        session.solver().constraint(projection).direction(),
        Direction::Backward
    );
    assert_eq!(session.solver().value(src), 5.0);
    session.finish();

    // With the edit gone the stay reclaims the source and the relation
    // flips forward again, keeping the edited values.
    assert_eq!(solver.constraint(projection).direction(), Direction::Forward);
    assert_eq!(solver.value(src), 5.0);
    assert_eq!(solver.value(dst), 1050.0);
    assert_consistent(&solver);
}

#[test]
fn shared_factors_update_a_whole_projection_batch() {
    let mut solver = Solver::new();
    let scale = solver.add_variable("scale", 10.0);
    let offset = solver.add_variable("offset", 1000.0);
    let mut sources = Vec::new();
    let mut destinations = Vec::new();
    for i in 0..8 {
        let src = solver.add_variable(format!("src{i}"), f64::from(i));
        let dst = solver.add_variable(format!("dst{i}"), f64::from(i));
        solver.add_stay(src, Strength::Normal);
        solver.add_scale(src, scale, offset, dst, Strength::Required);
        sources.push(src);
        destinations.push(dst);
    }
    for (i, &dst) in (0_u32..).zip(&destinations) {
        assert_eq!(solver.value(dst), f64::from(i) * 10.0 + 1000.0);
    }

    solver.change(*sources.last().unwrap(), 17.0);
    assert_eq!(solver.value(*destinations.last().unwrap()), 1170.0);

    solver.change(*destinations.last().unwrap(), 1050.0);
    assert_eq!(solver.value(*sources.last().unwrap()), 5.0);

    // Editing the shared multiplier reruns every projection. The last
    // source is no longer at its initial value, so it is checked apart.
    solver.change(scale, 5.0);
    for (i, &dst) in (0_u32..).zip(&destinations).take(7) {
        assert_eq!(solver.value(dst), f64::from(i) * 5.0 + 1000.0);
    }
    assert_eq!(solver.value(*destinations.last().unwrap()), 1025.0);

    solver.change(offset, 2000.0);
    for (i, &dst) in (0_u32..).zip(&destinations).take(7) {
        assert_eq!(solver.value(dst), f64::from(i) * 5.0 + 2000.0);
    }
    assert_eq!(solver.value(*destinations.last().unwrap()), 2025.0);
    assert_consistent(&solver);
}

#[test]
fn replaying_a_plan_without_new_input_changes_nothing() {
    let mut solver = Solver::new();
    let (variables, _) = build_chain(&mut solver, 100);
    let first = variables[0];
    solver.add_stay(*variables.last().unwrap(), Strength::StrongDefault);
    let edit = solver.add_edit(first, Strength::Preferred);
    let plan = solver.extract_plan(&[edit]);

    solver.graph_mut().set_value(first, 42.0);
    solver.execute_plan(&plan);
    let snapshot: Vec<f64> = variables.iter().map(|&v| solver.value(v)).collect();

    // With no intervening input mutation a second run is a no-op.
    solver.execute_plan(&plan);
    let replayed: Vec<f64> = variables.iter().map(|&v| solver.value(v)).collect();
    assert_eq!(replayed, snapshot);
    assert_consistent(&solver);
}

#[test]
fn create_then_destroy_restores_the_previous_state() {
    let mut solver = Solver::new();
    let (variables, _) = build_chain(&mut solver, 4);
    solver.add_stay(variables[3], Strength::StrongDefault);

    let snapshot: Vec<(f64, Strength, bool)> = variables
        .iter()
        .map(|&v| {
            let variable = solver.variable(v);
            (variable.value(), variable.walk_strength(), variable.stay())
        })
        .collect();

    // A mid-chain edit flips the dataflow around; retracting it must put
    // every variable back the way it was.
    let edit = solver.add_edit(variables[1], Strength::Preferred);
    solver.destroy_constraint(edit);

    let restored: Vec<(f64, Strength, bool)> = variables
        .iter()
        .map(|&v| {
            let variable = solver.variable(v);
            (variable.value(), variable.walk_strength(), variable.stay())
        })
        .collect();
    assert_eq!(restored, snapshot);
    assert_consistent(&solver);
}

#[test]
fn an_active_edit_shields_its_pair_from_factor_changes() {
    let mut solver = Solver::new();
    let scale = solver.add_variable("scale", 10.0);
    let offset = solver.add_variable("offset", 1000.0);
    let mut pairs = Vec::new();
    for i in 0..4 {
        let src = solver.add_variable(format!("src{i}"), f64::from(i));
        let dst = solver.add_variable(format!("dst{i}"), 0.0);
        solver.add_stay(src, Strength::Normal);
        solver.add_scale(src, scale, offset, dst, Strength::Required);
        pairs.push((src, dst));
    }

    // Hold one destination with an edit, then rescale everything else.
    let (held_src, held_dst) = pairs[1];
    let edit = solver.add_edit(held_dst, Strength::Preferred);
    let plan = solver.extract_plan(&[edit]);
    solver.graph_mut().set_value(held_dst, 1070.0);
    solver.execute_plan(&plan);
    assert_eq!(solver.value(held_src), 7.0);

    solver.change(scale, 5.0);

    for (i, &(_, dst)) in (0_u32..).zip(&pairs) {
        if dst == held_dst {
            // The held pair answers to its edit, not to the shared factor.
            assert_eq!(solver.value(dst), 1070.0);
            assert_eq!(solver.value(held_src), 7.0);
        } else {
            assert_eq!(solver.value(dst), f64::from(i) * 5.0 + 1000.0);
        }
    }
    solver.destroy_constraint(edit);
    assert_consistent(&solver);
}

#[test]
fn cycles_are_rejected_and_reported() {
    let mut solver = Solver::new();
    let mut log = DiagnosticLog::new();
    let a = solver.add_variable("a", 6.0);
    let b = solver.add_variable("b", 0.0);
    let c = solver.add_variable("c", 0.0);
    let ab = solver.add_equality(a, b, Strength::Required);
    let bc = solver.add_equality(b, c, Strength::Required);
    assert_eq!(solver.value(c), 6.0);

    let ca = solver.add_constraint_with_trace(
        ConstraintKind::Equality { left: c, right: a },
        Strength::Required,
        &mut log,
    );

    assert_eq!(log.events(), &[Diagnostic::CycleDetected { constraint: ca }]);
    assert!(!solver.constraint(ca).is_satisfied());
    assert!(solver.constraint(ab).is_satisfied());
    assert!(solver.constraint(bc).is_satisfied());

    // The offender is fully detached and the old solution still stands.
    assert_eq!(solver.graph().variable(a).constraints(), &[ab]);
    assert_eq!(solver.value(c), 6.0);
    assert_consistent(&solver);
}

#[test]
fn unsatisfiable_required_constraints_are_reported() {
    let mut solver = Solver::new();
    let mut log = DiagnosticLog::new();
    let v = solver.add_variable("v", 0.0);
    solver.add_stay(v, Strength::Required);

    let lost = solver.add_constraint_with_trace(
        ConstraintKind::Edit { variable: v },
        Strength::Required,
        &mut log,
    );

    assert_eq!(
        log.first_for(lost),
        Some(Diagnostic::UnsatisfiableRequired { constraint: lost })
    );
    assert!(!solver.constraint(lost).is_satisfied());
    assert_consistent(&solver);
}

#[test]
fn destroying_an_edit_restores_the_previous_dataflow() {
    let mut solver = Solver::new();
    let v0 = solver.add_variable("v0", 0.0);
    let v1 = solver.add_variable("v1", 0.0);
    let v2 = solver.add_variable("v2", 0.0);
    let eq01 = solver.add_equality(v0, v1, Strength::Required);
    let eq12 = solver.add_equality(v1, v2, Strength::Required);
    let anchor = solver.add_stay(v0, Strength::WeakDefault);

    let mut session = solver.begin_edit(v1, Strength::Preferred);
    session.set_value(7.5);

    // Mid-edit the chain points away from the edited variable.
    assert_eq!(
        session.solver().constraint(eq01).direction(),
        Direction::Backward
    );
    assert_eq!(session.solver().value(v0), 7.5);
    session.finish();

    // The weak stay reclaims the head and the chain flows forward again,
    // carrying the last edited value.
    for v in [v0, v1, v2] {
        assert_eq!(solver.value(v), 7.5);
        assert_eq!(solver.variable(v).walk_strength(), Strength::WeakDefault);
        assert!(solver.variable(v).stay());
    }
    assert_eq!(solver.variable(v0).determined_by(), Some(anchor));
    assert_eq!(solver.variable(v1).determined_by(), Some(eq01));
    assert_eq!(solver.variable(v2).determined_by(), Some(eq12));
    assert_eq!(solver.constraint(eq01).direction(), Direction::Forward);
    assert_eq!(solver.constraint(eq12).direction(), Direction::Forward);
    assert_consistent(&solver);
}
