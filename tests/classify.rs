use league_ledger::classify::{
    FinishField, FinishGroup, Medal, RankChange, championship_years, classify_finishes,
    finish_badge, finish_groups, format_finish_groups, medals, ordinal, rank_change, streak_badge,
};
use league_ledger::types::SeasonRecord;

fn season(year: i32, finish: Option<u32>, seed: Option<u32>) -> SeasonRecord {
    SeasonRecord {
        season: year,
        team_name: format!("Team {year}"),
        finish,
        playoff_seed: seed,
        ..SeasonRecord::default()
    }
}

fn history() -> Vec<SeasonRecord> {
    vec![
        season(2016, Some(4), Some(5)),
        season(2017, Some(1), Some(2)),
        season(2018, None, None),
        season(2019, Some(3), Some(1)),
        season(2020, Some(1), Some(1)),
        season(2021, Some(2), None),
        season(2022, Some(4), Some(6)),
    ]
}

#[test]
fn finish_badges() {
    assert_eq!(finish_badge(1), "\u{1F947}");
    assert_eq!(finish_badge(2), "\u{1F948}");
    assert_eq!(finish_badge(3), "\u{1F949}");
    assert_eq!(finish_badge(4), "4th");
    assert_eq!(finish_badge(11), "11th");
    assert_eq!(finish_badge(21), "21st");
}

#[test]
fn ordinals() {
    let cases = [
        (1, "1st"),
        (2, "2nd"),
        (3, "3rd"),
        (4, "4th"),
        (12, "12th"),
        (13, "13th"),
        (22, "22nd"),
        (101, "101st"),
        (111, "111th"),
    ];
    for (n, expected) in cases {
        assert_eq!(ordinal(n), expected);
    }
}

#[test]
fn championships_match_gold_medals() {
    let records = history();
    let golds = medals(&records)
        .into_iter()
        .filter(|m| *m == Medal::Gold)
        .count();
    assert_eq!(championship_years(&records), vec![2017, 2020]);
    assert_eq!(championship_years(&records).len(), golds);
}

#[test]
fn medals_follow_season_order() {
    assert_eq!(
        medals(&history()),
        vec![Medal::Gold, Medal::Bronze, Medal::Gold, Medal::Silver]
    );
    assert!(medals(&[]).is_empty());
}

#[test]
fn finish_groups_are_sorted_and_partition_input() {
    let records = history();
    for field in [FinishField::Finish, FinishField::PlayoffSeed] {
        let groups = finish_groups(&records, field);
        assert!(groups.windows(2).all(|w| w[0].rank < w[1].rank));

        let non_null = records
            .iter()
            .filter(|r| match field {
                FinishField::Finish => r.finish.is_some(),
                FinishField::PlayoffSeed => r.playoff_seed.is_some(),
            })
            .count();
        assert_eq!(groups.iter().map(|g| g.count).sum::<usize>(), non_null);

        let mut years: Vec<i32> = groups.iter().flat_map(|g| g.years.clone()).collect();
        years.sort_unstable();
        years.dedup();
        assert_eq!(years.len(), non_null);
    }
}

#[test]
fn finish_groups_collect_years() {
    let groups = finish_groups(&history(), FinishField::Finish);
    assert_eq!(
        groups[0],
        FinishGroup {
            rank: 1,
            count: 2,
            years: vec![2017, 2020],
        }
    );
    assert_eq!(groups.last().map(|g| g.rank), Some(4));
    assert_eq!(groups.last().map(|g| g.years.clone()), Some(vec![2016, 2022]));
}

#[test]
fn formats_groups() {
    let groups = finish_groups(&history(), FinishField::PlayoffSeed);
    assert_eq!(
        format_finish_groups(&groups),
        "1sts: 2 (2019, 2020), 2nds: 1 (2017), 5ths: 1 (2016), 6ths: 1 (2022)"
    );
    assert_eq!(format_finish_groups(&[]), "N/A");
}

#[test]
fn classification_bundles_everything() {
    let c = classify_finishes(&history());
    assert_eq!(c.championship_years, vec![2017, 2020]);
    assert_eq!(c.medals.len(), 4);
    assert_eq!(c.finish_groups.len(), 4);
    assert_eq!(c.seed_groups[0].rank, 1);

    let empty = classify_finishes(&[season(2020, None, None)]);
    assert!(empty.medals.is_empty());
    assert!(empty.finish_groups.is_empty());
    assert!(empty.seed_groups.is_empty());
}

#[test]
fn streaks_and_rank_moves() {
    assert_eq!(streak_badge(4).as_deref(), Some("W4"));
    assert_eq!(streak_badge(-3).as_deref(), Some("L3"));
    assert_eq!(streak_badge(0), None);

    assert_eq!(rank_change(2, 5), RankChange::Up(3));
    assert_eq!(rank_change(6, 1), RankChange::Down(5));
    assert_eq!(rank_change(3, 3), RankChange::Same);
}
