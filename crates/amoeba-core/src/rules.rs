//! Rule compilation.
//!
//! Three rule sets are derived from a clause model, once per instance:
//!
//! - **INTRA**: an active unit inhibits the other unit of its variable, so a
//!   variable can never settle on both values.
//! - **INTER**: for every literal of a clause, if the units falsifying all the
//!   *other* literals are active, the unit falsifying this literal is
//!   inhibited. A clause therefore cannot be driven to all-false.
//! - **CONTRA**: when INTER can inhibit both units of a variable, the union of
//!   the two premises becomes a rule that inhibits every unit in it. Without
//!   it a variable can freeze with neither unit allowed to grow.

use amoeba_base::{Clause, ClauseModel, Polarity, UnitId, Var};
use std::collections::{BTreeMap, HashSet};

/// `source` active forces inhibition of `target`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct IntraRule {
    pub source: UnitId,
    pub target: UnitId,
}

/// Every unit in `premise` active forces inhibition of `target`.
///
/// The premise holds one falsifying unit per other literal of the clause, in
/// clause order. Only its contents matter, not the order.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct InterRule {
    pub premise: Vec<UnitId>,
    pub target: UnitId,
}

/// Every unit in `units` active forces inhibition of all of them.
///
/// `units` is sorted and free of duplicates, so rules compare as sets.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ContraRule {
    pub units: Vec<UnitId>,
}

/// The compiled, immutable rule sets of one problem instance.
///
/// Shared read-only between any number of concurrent runs.
#[derive(Debug, Clone)]
pub struct RuleSet {
    num_vars: usize,
    pub intra: Vec<IntraRule>,
    pub inter: Vec<InterRule>,
    pub contra: Vec<ContraRule>,
}

impl RuleSet {
    /// Compiles all three rule sets for a clause model.
    pub fn compile(model: &ClauseModel) -> Self {
        let intra = compile_intra(model.num_vars());
        let inter = compile_inter(model.clauses());
        let contra = compile_contra(&inter);

        tracing::debug!(
            vars = model.num_vars(),
            intra = intra.len(),
            inter = inter.len(),
            contra = contra.len(),
            "compiled rule sets"
        );

        Self {
            num_vars: model.num_vars(),
            intra,
            inter,
            contra,
        }
    }

    /// Returns the number of variables the rules were compiled for.
    #[must_use]
    pub fn num_vars(&self) -> usize {
        self.num_vars
    }

    /// Returns the number of units the rules address.
    #[must_use]
    pub fn num_units(&self) -> usize {
        2 * self.num_vars
    }
}

/// Builds the INTRA rules: two per variable, one in each direction.
#[must_use]
pub fn compile_intra(num_vars: usize) -> Vec<IntraRule> {
    let mut rules = Vec::with_capacity(2 * num_vars);
    for var in (0..num_vars).map(Var::from_index) {
        let t = UnitId::true_unit(var);
        let f = UnitId::false_unit(var);
        rules.push(IntraRule { source: t, target: f });
        rules.push(IntraRule { source: f, target: t });
    }
    rules
}

/// Builds the INTER rules: one per literal of every clause.
#[must_use]
pub fn compile_inter(clauses: &[Clause]) -> Vec<InterRule> {
    let total = clauses.iter().map(Clause::len).sum();
    let mut rules = Vec::with_capacity(total);

    for clause in clauses {
        let falsifying: Vec<UnitId> = clause
            .literals()
            .iter()
            .map(|lit| lit.falsifying_unit())
            .collect();

        for (idx, &target) in falsifying.iter().enumerate() {
            let premise = falsifying[..idx]
                .iter()
                .chain(&falsifying[idx + 1..])
                .copied()
                .collect();
            rules.push(InterRule { premise, target });
        }
    }
    rules
}

/// Builds the CONTRA rules from the INTER rules.
///
/// INTER premises are grouped by target. For every variable targeted on both
/// polarities, each premise aimed at its true-unit is merged with each premise
/// aimed at its false-unit. Variables targeted on one polarity only yield
/// nothing. Merges that come out empty would never inhibit anything and are
/// skipped.
#[must_use]
pub fn compile_contra(inter: &[InterRule]) -> Vec<ContraRule> {
    let mut targets: BTreeMap<UnitId, Vec<&[UnitId]>> = BTreeMap::new();
    for rule in inter {
        targets.entry(rule.target).or_default().push(&rule.premise);
    }

    let mut seen = HashSet::new();
    let mut rules = Vec::new();

    for (unit, true_premises) in &targets {
        if unit.polarity() != Polarity::True {
            continue;
        }
        let Some(false_premises) = targets.get(&unit.sibling()) else {
            continue;
        };

        for p in true_premises {
            for q in false_premises {
                let mut units: Vec<UnitId> = p.iter().chain(q.iter()).copied().collect();
                units.sort_unstable();
                units.dedup();
                if !units.is_empty() && seen.insert(units.clone()) {
                    rules.push(ContraRule { units });
                }
            }
        }
    }
    rules
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn var(id: u32) -> Var {
        Var::new(id).unwrap()
    }

    fn t(id: u32) -> UnitId {
        UnitId::true_unit(var(id))
    }

    fn f(id: u32) -> UnitId {
        UnitId::false_unit(var(id))
    }

    fn clauses(lits: &[&[i64]]) -> Vec<Clause> {
        lits.iter().map(|c| Clause::from_dimacs(c).unwrap()).collect()
    }

    fn sorted(mut units: Vec<UnitId>) -> Vec<UnitId> {
        units.sort_unstable();
        units
    }

    #[test]
    fn test_intra_pairs() {
        let rules = compile_intra(2);
        assert_eq!(rules.len(), 4);
        assert!(rules.contains(&IntraRule { source: t(1), target: f(1) }));
        assert!(rules.contains(&IntraRule { source: f(1), target: t(1) }));
        assert!(rules.contains(&IntraRule { source: t(2), target: f(2) }));
        assert!(rules.contains(&IntraRule { source: f(2), target: t(2) }));
    }

    #[test]
    fn test_inter_positive_clause() {
        let rules = compile_inter(&clauses(&[&[1, 2, 3]]));
        assert_eq!(rules.len(), 3);
        assert_eq!(rules[0].target, f(1));
        assert_eq!(sorted(rules[0].premise.clone()), vec![f(2), f(3)]);
        assert_eq!(rules[1].target, f(2));
        assert_eq!(sorted(rules[1].premise.clone()), vec![f(1), f(3)]);
        assert_eq!(rules[2].target, f(3));
        assert_eq!(sorted(rules[2].premise.clone()), vec![f(1), f(2)]);
    }

    #[test]
    fn test_inter_negated_literal_uses_true_unit() {
        let rules = compile_inter(&clauses(&[&[-1, 2, -3]]));
        assert_eq!(rules[0].target, t(1));
        assert_eq!(sorted(rules[0].premise.clone()), vec![f(2), t(3)]);
        assert_eq!(rules[2].target, t(3));
        assert_eq!(sorted(rules[2].premise.clone()), vec![t(1), f(2)]);
    }

    #[test]
    fn test_contra_needs_both_polarities() {
        // Only false-units are ever targeted.
        let inter = compile_inter(&clauses(&[&[1, 2, 3], &[1, -2, 3]]));
        let contra = compile_contra(&inter);
        // Variable 2 is targeted on both polarities: {f1,f3} -> t2 and {f1,f3} -> f2.
        assert_eq!(contra, vec![ContraRule { units: sorted(vec![f(1), f(3)]) }]);

        let inter = compile_inter(&clauses(&[&[1, 2, 3]]));
        assert!(compile_contra(&inter).is_empty());
    }

    #[test]
    fn test_contra_merges_every_pair() {
        let inter = compile_inter(&clauses(&[&[1, 2, 3], &[-1, 4, 5], &[-1, -4, 2]]));
        let contra = compile_contra(&inter);

        // Variable 1: t1 <- {f4,f5}, t1 <- {t4,f2}; f1 <- {f2,f3}.
        // Variable 4: t4 <- {t1,f2}; f4 <- {t1,f5}.
        let expected = vec![
            sorted(vec![f(4), f(5), f(2), f(3)]),
            sorted(vec![t(4), f(2), f(3)]),
            sorted(vec![t(1), f(2), f(5)]),
        ];
        let got: Vec<_> = contra.iter().map(|r| r.units.clone()).collect();
        assert_eq!(got.len(), expected.len());
        for rule in expected {
            assert!(got.contains(&rule), "missing {rule:?}");
        }
    }

    #[test]
    fn test_contra_deduplicates_as_sets() {
        // t1 has two premises listing {f2,f3} in different orders; both merge
        // with f1's premise to the same set.
        let inter = compile_inter(&clauses(&[&[1, 2, 3], &[-1, 2, 3], &[-1, 3, 2]]));
        let contra = compile_contra(&inter);
        assert_eq!(contra, vec![ContraRule { units: sorted(vec![f(2), f(3)]) }]);
    }

    #[test]
    fn test_rule_set_compile() {
        let model = ClauseModel::from_dimacs(4, &[vec![1, -2, 3], vec![2, 3, -4]]).unwrap();
        let rules = RuleSet::compile(&model);
        assert_eq!(rules.num_vars(), 4);
        assert_eq!(rules.num_units(), 8);
        assert_eq!(rules.intra.len(), 8);
        assert_eq!(rules.inter.len(), 6);
        assert_eq!(rules.contra.len(), 1);
    }

    fn arb_clauses() -> impl Strategy<Value = (usize, Vec<Vec<i64>>)> {
        (1usize..8).prop_flat_map(|num_vars| {
            let lit = (1..=num_vars as i64, any::<bool>())
                .prop_map(|(v, neg)| if neg { -v } else { v });
            let clause = prop::collection::vec(lit, 1..6);
            (Just(num_vars), prop::collection::vec(clause, 1..12))
        })
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(100))]

        #[test]
        fn prop_intra_count(num_vars in 0usize..200) {
            prop_assert_eq!(compile_intra(num_vars).len(), 2 * num_vars);
        }

        #[test]
        fn prop_inter_shape((num_vars, lits) in arb_clauses()) {
            let model = ClauseModel::from_dimacs(num_vars, &lits).unwrap();
            let inter = compile_inter(model.clauses());
            let total: usize = lits.iter().map(Vec::len).sum();
            prop_assert_eq!(inter.len(), total);

            let mut rules = inter.iter();
            for clause in &lits {
                for _ in clause {
                    let rule = rules.next().unwrap();
                    prop_assert_eq!(rule.premise.len(), clause.len() - 1);
                }
            }
        }

        #[test]
        fn prop_contra_well_formed((num_vars, lits) in arb_clauses()) {
            let model = ClauseModel::from_dimacs(num_vars, &lits).unwrap();
            let rules = RuleSet::compile(&model);

            let targeted: HashSet<UnitId> = rules.inter.iter().map(|r| r.target).collect();
            let both: HashSet<Var> = targeted
                .iter()
                .filter(|u| targeted.contains(&u.sibling()))
                .map(|u| u.var())
                .collect();
            if both.is_empty() {
                prop_assert!(rules.contra.is_empty());
            }

            // Every pairwise union of a true-unit premise with a false-unit
            // premise of the same variable, as sorted sets.
            let mut unions = HashSet::new();
            for p in &rules.inter {
                if p.target.polarity() != Polarity::True {
                    continue;
                }
                for q in rules.inter.iter().filter(|q| q.target == p.target.sibling()) {
                    let mut units: Vec<UnitId> =
                        p.premise.iter().chain(&q.premise).copied().collect();
                    units.sort_unstable();
                    units.dedup();
                    if !units.is_empty() {
                        unions.insert(units);
                    }
                }
            }
            let compiled: HashSet<Vec<UnitId>> =
                rules.contra.iter().map(|r| r.units.clone()).collect();
            prop_assert_eq!(compiled, unions);

            let unique: HashSet<&Vec<UnitId>> = rules.contra.iter().map(|r| &r.units).collect();
            prop_assert_eq!(unique.len(), rules.contra.len());
            for rule in &rules.contra {
                prop_assert!(rule.units.windows(2).all(|w| w[0] < w[1]));
                prop_assert!(rule.units.iter().all(|u| u.index() < rules.num_units()));
            }
        }
    }
}
