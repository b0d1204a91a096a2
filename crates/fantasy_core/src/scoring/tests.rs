//! Scoring engine behaviour under the presets and small hand-written rule sets

use super::*;
use crate::models::{BattingFacet, BowlingFacet, FieldingFacet, InningsContext, Overs};
use proptest::prelude::*;

fn batting(runs: u32, balls: u32, fours: u32, sixes: u32, dismissed: bool) -> RawPerformance {
    let mut p = RawPerformance::for_player("Test Batter");
    p.batting = BattingFacet { runs, balls_faced: balls, fours, sixes, batted: true, dismissed };
    p
}

fn spell(balls: u32, runs_conceded: u32, wickets: u32, maidens: u32, dot_balls: u32) -> RawPerformance {
    let mut p = RawPerformance::for_player("Test Bowler");
    p.bowling = BowlingFacet {
        overs: Overs::from_balls(balls),
        runs_conceded,
        wickets,
        maidens,
        dot_balls,
        ..Default::default()
    };
    p
}

fn rules(yaml: &str) -> ScoringRuleSet {
    ScoringRuleSet::from_yaml_str(yaml).unwrap()
}

fn missing_rule(result: Result<ScoreBreakdown, ScoringError>) -> String {
    match result {
        Err(ScoringError::MissingRuleDefinition { rule, .. }) => rule,
        other => panic!("expected MissingRuleDefinition, got {:?}", other),
    }
}

#[test]
fn test_zero_record_scores_zero() {
    let bare = rules("name: bare\n");
    for rule_set in [ScoringRuleSet::standard(), ScoringRuleSet::flat(), bare] {
        for role in PlayerRole::ALL {
            let breakdown = score(&RawPerformance::for_player("Bench"), role, &rule_set).unwrap();
            assert!(breakdown.is_zero(), "{} / {}: {:?}", rule_set.name(), role, breakdown);
        }
    }
}

#[test]
fn test_batting_innings_under_standard() {
    let rules = ScoringRuleSet::standard();
    let innings = batting(52, 30, 4, 2, true);

    let breakdown = score(&innings, PlayerRole::Batter, &rules).unwrap();
    let detail = breakdown.batting_detail;
    assert_eq!(detail.runs, 52.0);
    assert_eq!(detail.boundaries, 8.0);
    assert_eq!(detail.milestone, 10.0);
    assert_eq!(detail.duck, 0.0);
    // 173.3 clears the 170 tier.
    assert_eq!(detail.strike_rate, 4.0);
    assert_eq!(detail.differential, 0.0);
    assert_eq!(breakdown.batting, 74.0);
    assert_eq!(breakdown.total, 74.0);

    // Batting outside the registered role is boosted.
    let bowler = score(&innings, PlayerRole::Bowler, &rules).unwrap();
    assert_eq!(bowler.batting, 111.0);
    assert_eq!(bowler.total, 111.0);
    assert_eq!(bowler.batting_detail, detail);
}

#[test]
fn test_bowling_spell_under_standard() {
    let rules = ScoringRuleSet::standard();
    let mut figures = spell(24, 24, 3, 1, 12);
    figures.bowling.wides = 1;

    let breakdown = score(&figures, PlayerRole::Bowler, &rules).unwrap();
    let detail = breakdown.bowling_detail;
    assert_eq!(detail.wickets, 75.0);
    assert_eq!(detail.hauls, 5.0);
    assert_eq!(detail.maidens, 12.0);
    assert_eq!(detail.dot_balls, 12.0);
    assert_eq!(detail.extras, -1.0);
    // Economy 6.0 sits on the 6 threshold; strict boundaries give the 7 tier.
    assert_eq!(detail.economy, 2.0);
    assert_eq!(breakdown.bowling, 105.0);
    assert_eq!(breakdown.total, 105.0);

    let batter = score(&figures, PlayerRole::Batter, &rules).unwrap();
    assert_eq!(batter.bowling, 157.5);
}

#[test]
fn test_economy_tie_break_modes() {
    let with_boundary = |boundary: &str| {
        rules(&format!(
            "bowling:\n  economy:\n    min_overs: 1.0\n    boundary: {boundary}\n    bonuses:\n      - {{ threshold: 7, points: 2 }}\n      - {{ threshold: 6, points: 4 }}\n"
        ))
    };
    let figures = spell(24, 24, 0, 0, 0);

    let strict = score(&figures, PlayerRole::Bowler, &with_boundary("strict")).unwrap();
    assert_eq!(strict.bowling_detail.economy, 2.0);

    let inclusive = score(&figures, PlayerRole::Bowler, &with_boundary("inclusive")).unwrap();
    assert_eq!(inclusive.bowling_detail.economy, 4.0);
}

#[test]
fn test_strike_rate_threshold_inclusive_in_standard() {
    // 30 off 20 is exactly 150.
    let breakdown = score(&batting(30, 20, 0, 0, true), PlayerRole::Batter, &ScoringRuleSet::standard()).unwrap();
    assert_eq!(breakdown.batting_detail.strike_rate, 2.0);
    assert_eq!(breakdown.batting_detail.milestone, 5.0);
}

/// Rate tables that would fire on any sample, behind explicit minimums.
fn guarded() -> ScoringRuleSet {
    rules(
        "name: guarded
batting:
  per_run: 1
  milestones: { tiers: [] }
  strike_rate:
    min_balls: 10
    bonuses:
      - { threshold: 100, points: 4 }
    penalties:
      - { threshold: 100, points: -4 }
bowling:
  economy:
    min_overs: 1.0
    bonuses:
      - { threshold: 100, points: 4 }
    penalties:
      - { threshold: 0, points: -4 }
",
    )
}

#[test]
fn test_no_strike_rate_adjustment_below_minimum_balls() {
    let rules = guarded();
    let short = score(&batting(12, 2, 0, 0, false), PlayerRole::Batter, &rules).unwrap();
    assert_eq!(short.batting_detail.strike_rate, 0.0);
    assert_eq!(short.total, 12.0);

    let long = score(&batting(30, 10, 0, 0, false), PlayerRole::Batter, &rules).unwrap();
    assert_eq!(long.batting_detail.strike_rate, 4.0);
}

#[test]
fn test_standard_strike_rate_bonus_has_no_ball_minimum() {
    // 20 off 6 is a strike rate of 333.
    let breakdown = score(&batting(20, 6, 0, 0, false), PlayerRole::Batter, &ScoringRuleSet::standard()).unwrap();
    assert_eq!(breakdown.batting_detail.strike_rate, 10.0);

    let cameo = score(&batting(12, 2, 0, 2, false), PlayerRole::Batter, &ScoringRuleSet::standard()).unwrap();
    assert_eq!(cameo.batting_detail.strike_rate, 0.0);
    assert_eq!(cameo.total, 16.0);
}

#[test]
fn test_strike_rate_bonus_needs_minimum_runs() {
    let rules = ScoringRuleSet::standard();
    let short = score(&batting(18, 10, 0, 0, true), PlayerRole::Batter, &rules).unwrap();
    assert_eq!(short.batting_detail.strike_rate, 0.0);

    let enough = score(&batting(20, 10, 0, 0, true), PlayerRole::Batter, &rules).unwrap();
    assert_eq!(enough.batting_detail.strike_rate, 6.0);
}

#[test]
fn test_strike_rate_penalty_tier_sample_guard() {
    let rules = ScoringRuleSet::standard();
    let fourteen = score(&batting(10, 14, 0, 0, true), PlayerRole::Batter, &rules).unwrap();
    assert_eq!(fourteen.batting_detail.strike_rate, 0.0);

    let fifteen = score(&batting(10, 15, 0, 0, true), PlayerRole::Batter, &rules).unwrap();
    assert_eq!(fifteen.batting_detail.strike_rate, -4.0);
    assert_eq!(fifteen.batting, 6.0);
}

#[test]
fn test_duck_and_negative_subtotals() {
    let duck = batting(0, 3, 0, 0, true);

    let standard = score(&duck, PlayerRole::Batter, &ScoringRuleSet::standard()).unwrap();
    assert_eq!(standard.batting, -5.0);
    assert_eq!(standard.total, -5.0);

    let flat = score(&duck, PlayerRole::Batter, &ScoringRuleSet::flat()).unwrap();
    assert!(flat.is_zero());

    let floored = rules(
        "name: floored\nallow_negative_subtotals: false\nbatting:\n  duck: -5\n  strike_rate: { min_balls: 10 }\n",
    );
    let breakdown = score(&duck, PlayerRole::Batter, &floored).unwrap();
    assert_eq!(breakdown.batting_detail.duck, -5.0);
    assert_eq!(breakdown.batting, 0.0);
    assert_eq!(breakdown.total, 0.0);
}

#[test]
fn test_not_out_without_runs_is_not_a_duck() {
    let breakdown = score(&batting(0, 4, 0, 0, false), PlayerRole::Batter, &ScoringRuleSet::standard()).unwrap();
    assert_eq!(breakdown.batting_detail.duck, 0.0);
}

#[test]
fn test_milestone_cumulativity_modes() {
    let with_additive = |additive: bool| {
        rules(&format!(
            "batting:\n  per_run: 1\n  milestones:\n    additive: {additive}\n    tiers:\n      - {{ at: 30, points: 5 }}\n      - {{ at: 50, points: 10 }}\n  strike_rate: {{ min_balls: 10 }}\n"
        ))
    };
    let innings = batting(55, 40, 0, 0, true);

    let highest = score(&innings, PlayerRole::Batter, &with_additive(false)).unwrap();
    assert_eq!(highest.batting_detail.milestone, 10.0);

    let additive = score(&innings, PlayerRole::Batter, &with_additive(true)).unwrap();
    assert_eq!(additive.batting_detail.milestone, 15.0);
    assert_eq!(additive.total, 70.0);
}

#[test]
fn test_policies_differ_for_allrounder() {
    let base = "batting: { per_run: 1, milestones: { tiers: [] }, strike_rate: { min_balls: 10 } }\nfielding: { catch: 10 }\n";
    let per_facet = rules(&format!(
        "name: per_facet\n{base}role_multipliers:\n  policy: per_facet\n  per_facet:\n    Batter: {{ batting: 1, bowling: 1, fielding: 1, award: 1 }}\n    Bowler: {{ batting: 1, bowling: 1, fielding: 1, award: 1 }}\n    Allrounder: {{ batting: 1, bowling: 1, fielding: 2, award: 1 }}\n    Keeper: {{ batting: 1, bowling: 1, fielding: 1, award: 1 }}\n"
    ));
    let grand_total = rules(&format!(
        "name: grand_total\n{base}role_multipliers:\n  policy: grand_total\n  grand_total: {{ Batter: 1, Bowler: 1, Allrounder: 1.5, Keeper: 1 }}\n"
    ));

    let mut record = batting(20, 16, 0, 0, false);
    record.fielding.catches = 1;

    let a = score(&record, PlayerRole::Allrounder, &per_facet).unwrap();
    assert_eq!((a.batting, a.fielding, a.total), (20.0, 20.0, 40.0));
    assert_eq!(
        a.multiplier,
        AppliedMultiplier::PerFacet {
            weights: FacetWeights { batting: 1.0, bowling: 1.0, fielding: 2.0, award: 1.0 }
        }
    );

    let b = score(&record, PlayerRole::Allrounder, &grand_total).unwrap();
    assert_eq!((b.batting, b.fielding, b.total), (30.0, 15.0, 45.0));
    assert_eq!(b.multiplier, AppliedMultiplier::GrandTotal { factor: 1.5 });

    // Roles weighted 1 are untouched by either policy.
    let batter_a = score(&record, PlayerRole::Batter, &per_facet).unwrap();
    let batter_b = score(&record, PlayerRole::Batter, &grand_total).unwrap();
    assert_eq!(batter_a.total, 30.0);
    assert_eq!(batter_b.total, 30.0);
}

#[test]
fn test_differentials_under_standard() {
    let rules = ScoringRuleSet::standard();

    let mut innings = batting(30, 20, 0, 0, true);
    innings.context = InningsContext { batting_strike_rate: Some(100.0), bowling_economy: None };
    let breakdown = score(&innings, PlayerRole::Batter, &rules).unwrap();
    // 50% above the innings strike rate.
    assert_eq!(breakdown.batting_detail.differential, 3.0);

    let mut figures = spell(24, 24, 0, 0, 0);
    figures.context.bowling_economy = Some(8.0);
    let breakdown = score(&figures, PlayerRole::Bowler, &rules).unwrap();
    // 25% cheaper than the bowling side.
    assert_eq!(breakdown.bowling_detail.differential, 1.0);
}

#[test]
fn test_missing_rules_are_reported() {
    let per_run_only = rules("name: partial\nbatting: { per_run: 1 }\n");
    let err = score(&batting(4, 1, 1, 0, false), PlayerRole::Batter, &per_run_only);
    assert_eq!(missing_rule(err), "batting.four");

    let dots_only = rules("bowling: { dot_ball: 1 }\n");
    assert_eq!(missing_rule(score(&spell(6, 0, 0, 1, 6), PlayerRole::Bowler, &dots_only)), "bowling.maiden");

    let mut potm = RawPerformance::for_player("Star");
    potm.player_of_the_match = true;
    let err = score(&potm, PlayerRole::Allrounder, &rules("name: bare\n")).unwrap_err();
    assert_eq!(
        err,
        ScoringError::MissingRuleDefinition {
            player: "Star".to_string(),
            rule: "awards.player_of_the_match".to_string()
        }
    );

    let no_differential = rules("batting: { per_run: 1, milestones: { tiers: [] }, strike_rate: { min_balls: 10 } }\n");
    let mut innings = batting(10, 8, 0, 0, false);
    innings.context.batting_strike_rate = Some(130.0);
    assert_eq!(missing_rule(score(&innings, PlayerRole::Batter, &no_differential)), "batting.differential");
}

#[test]
fn test_invalid_record_is_rejected_not_clamped() {
    let mut record = spell(6, 10, 0, 1, 6);
    record.player = "Bad Data".to_string();
    let err = score(&record, PlayerRole::Bowler, &ScoringRuleSet::standard()).unwrap_err();
    assert!(matches!(err, ScoringError::InvalidPerformanceData { ref player, .. } if player == "Bad Data"));
}

#[test]
fn test_award_under_standard() {
    let mut record = RawPerformance::for_player("Star");
    record.player_of_the_match = true;
    let breakdown = score(&record, PlayerRole::Keeper, &ScoringRuleSet::standard()).unwrap();
    assert_eq!(breakdown.award, 25.0);
    assert_eq!(breakdown.total, 25.0);
}

fn batting_facet() -> impl Strategy<Value = BattingFacet> {
    (0u32..60, 0u32..8, 0u32..5, 0u32..40, any::<bool>()).prop_map(
        |(balls, fours, sixes, others, dismissed)| {
            if balls == 0 {
                return BattingFacet { batted: true, dismissed, ..Default::default() };
            }
            let fours = fours.min(balls);
            let sixes = sixes.min(balls - fours);
            BattingFacet {
                runs: fours * 4 + sixes * 6 + others,
                balls_faced: balls,
                fours,
                sixes,
                batted: true,
                dismissed,
            }
        },
    )
}

fn bowling_facet() -> impl Strategy<Value = BowlingFacet> {
    (0u32..25, 0u32..40, 0u32..5, 0u32..4, 0u32..3, 0u32..2, 0u32..12).prop_map(
        |(balls, runs, wickets, maidens, wides, no_balls, dots)| {
            let overs = Overs::from_balls(balls);
            let maidens = maidens.min(overs.complete_overs());
            let dot_balls = (maidens * Overs::BALLS_PER_OVER + dots).min(balls);
            let scoring = balls - dot_balls + wides + no_balls;
            BowlingFacet {
                overs,
                runs_conceded: if scoring == 0 { 0 } else { runs },
                wickets: wickets.min(balls + wides + no_balls),
                maidens,
                dot_balls,
                wides,
                no_balls,
            }
        },
    )
}

fn fielding_facet() -> impl Strategy<Value = FieldingFacet> {
    (0u32..4, 0u32..3, 0u32..3, 0u32..3).prop_map(|(catches, stumpings, direct, assisted)| FieldingFacet {
        catches,
        stumpings,
        run_outs_direct: direct,
        run_outs_assisted: assisted,
    })
}

fn performance() -> impl Strategy<Value = RawPerformance> {
    (
        batting_facet(),
        bowling_facet(),
        fielding_facet(),
        any::<bool>(),
        prop::option::of(50.0f64..200.0),
        prop::option::of(4.0f64..12.0),
    )
        .prop_map(|(batting, bowling, fielding, potm, sr, eco)| RawPerformance {
            player: "Generated".to_string(),
            batting,
            bowling,
            fielding,
            player_of_the_match: potm,
            context: InningsContext { batting_strike_rate: sr, bowling_economy: eco },
        })
}

fn role() -> impl Strategy<Value = PlayerRole> {
    prop::sample::select(PlayerRole::ALL.to_vec())
}

proptest! {
    #[test]
    fn prop_scoring_is_deterministic(record in performance(), role in role()) {
        let rules = ScoringRuleSet::standard();
        let first = score(&record, role, &rules).unwrap();
        let second = score(&record.clone(), role, &rules).unwrap();
        prop_assert_eq!(first.total.to_bits(), second.total.to_bits());
        prop_assert_eq!(first.batting.to_bits(), second.batting.to_bits());
        prop_assert_eq!(first.bowling.to_bits(), second.bowling.to_bits());
        let sum = first.batting + first.bowling + first.fielding + first.award;
        prop_assert_eq!(first.total.to_bits(), sum.to_bits());
    }

    #[test]
    fn prop_flat_subtotals_never_negative(record in performance(), role in role()) {
        let breakdown = score(&record, role, &ScoringRuleSet::flat()).unwrap();
        prop_assert!(breakdown.batting >= 0.0);
        prop_assert!(breakdown.bowling >= 0.0);
        prop_assert!(breakdown.fielding >= 0.0);
        prop_assert!(breakdown.award >= 0.0);
    }

    #[test]
    fn prop_fielding_doubles_exactly(fielding in fielding_facet(), role in role()) {
        let rules = ScoringRuleSet::standard();
        let mut single = RawPerformance::for_player("Fielder");
        single.fielding = fielding;
        let mut double = single.clone();
        double.fielding = FieldingFacet {
            catches: fielding.catches * 2,
            stumpings: fielding.stumpings * 2,
            run_outs_direct: fielding.run_outs_direct * 2,
            run_outs_assisted: fielding.run_outs_assisted * 2,
        };
        let once = score(&single, role, &rules).unwrap();
        let twice = score(&double, role, &rules).unwrap();
        prop_assert_eq!(twice.fielding, 2.0 * once.fielding);
    }

    #[test]
    fn prop_milestones_monotone_in_runs(a in 0u32..200, b in 0u32..200, additive in any::<bool>()) {
        let (low, high) = if a <= b { (a, b) } else { (b, a) };
        let rules = rules(&format!(
            "batting:\n  per_run: 1\n  milestones:\n    additive: {additive}\n    tiers:\n      - {{ at: 30, points: 5 }}\n      - {{ at: 50, points: 10 }}\n      - {{ at: 100, points: 20 }}\n  strike_rate: {{ min_balls: 10 }}\n"
        ));
        let milestone = |runs: u32| {
            score(&batting(runs, runs.max(1), 0, 0, false), PlayerRole::Batter, &rules)
                .unwrap()
                .batting_detail
                .milestone
        };
        prop_assert!(milestone(low) <= milestone(high));
    }

    #[test]
    fn prop_no_rate_adjustment_below_minimum(runs in 0u32..60, balls in 1u32..10, conceded in 0u32..30, bowled in 1u32..6) {
        let rules = guarded();
        let innings = score(&batting(runs, balls, 0, 0, false), PlayerRole::Batter, &rules).unwrap();
        prop_assert_eq!(innings.batting_detail.strike_rate, 0.0);

        let figures = score(&spell(bowled, conceded, 0, 0, 0), PlayerRole::Bowler, &rules).unwrap();
        prop_assert_eq!(figures.bowling_detail.economy, 0.0);
    }
}
