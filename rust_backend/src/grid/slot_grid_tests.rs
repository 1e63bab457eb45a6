use super::*;
use crate::codes::BillingCodeTable;

const WEEKDAY_DAYTIME: &str = "01_011_0107_1_1";
const SATURDAY: &str = "01_013_0107_1_1";

fn table() -> BillingCodeTable {
    BillingCodeTable::ndis_default()
}

fn weekday_only(_: DayIndex) -> DayType {
    DayType::Weekday
}

fn monday() -> DayIndex {
    DayIndex::new(1).unwrap()
}

#[test]
fn test_new_grid_is_empty() {
    let grid = SlotGrid::new(SlotSize::DEFAULT);
    assert!(grid.is_empty());
    assert_eq!(grid.assigned(), 0);
}

#[test]
fn test_ensure_week_materializes_full_shape() {
    let grid = SlotGrid::new(SlotSize::DEFAULT).ensure_week(-2);
    let week = grid.week(-2).unwrap();
    assert_eq!(week.days().count(), 7);
    for (_, day) in week.days() {
        assert_eq!(day.slots().len(), 96);
        assert_eq!(day.assigned(), 0);
    }
}

#[test]
fn test_ensure_week_is_idempotent() {
    let table = table();
    let code = table.lookup(SATURDAY).unwrap();
    let selection = Selection::day_range(DayIndex::SATURDAY, 0..4);
    let grid = SlotGrid::new(SlotSize::DEFAULT)
        .apply_code(0, &selection, code)
        .unwrap()
        .grid;

    let again = grid.ensure_week(0);
    assert_eq!(again, grid);
    assert_eq!(again.assigned(), 4);
}

#[test]
fn test_apply_code_then_clear_restores_unassigned() {
    let table = table();
    let code = table.lookup(WEEKDAY_DAYTIME).unwrap();
    let selection = Selection::from_pairs([(1, 30), (2, 31), (3, 32)]).unwrap();

    let applied = SlotGrid::new(SlotSize::DEFAULT)
        .apply_code(0, &selection, code)
        .unwrap();
    assert_eq!(applied.written, 3);
    assert_eq!(applied.grid.assigned(), 3);

    let cleared = applied.grid.clear(0, &selection).unwrap().grid;
    for coord in &selection {
        assert!(cleared.code_at(0, *coord).is_none());
    }
    assert_eq!(cleared.assigned(), 0);
}

#[test]
fn test_operations_do_not_alias_previous_snapshot() {
    let table = table();
    let code = table.lookup(WEEKDAY_DAYTIME).unwrap();
    let selection = Selection::day_range(monday(), 24..28);

    let before = SlotGrid::new(SlotSize::DEFAULT).ensure_week(0);
    let after = before.apply_code(0, &selection, code).unwrap().grid;

    assert_eq!(before.assigned(), 0);
    assert_eq!(after.assigned(), 4);
}

#[test]
fn test_duplicate_selection_is_idempotent() {
    let table = table();
    let code = table.lookup(WEEKDAY_DAYTIME).unwrap();
    let once = Selection::from_pairs([(1, 40)]).unwrap();
    let twice = Selection::from_pairs([(1, 40), (1, 40)]).unwrap();

    let a = SlotGrid::new(SlotSize::DEFAULT)
        .apply_code(0, &once, code)
        .unwrap();
    let b = SlotGrid::new(SlotSize::DEFAULT)
        .apply_code(0, &twice, code)
        .unwrap();
    assert_eq!(a.grid, b.grid);
    assert_eq!(b.written, 1);

    let cleared = b.grid.clear(0, &twice).unwrap();
    assert_eq!(cleared.written, 1);
    assert_eq!(cleared.grid.assigned(), 0);
}

#[test]
fn test_empty_selection_is_noop() {
    let table = table();
    let code = table.lookup(WEEKDAY_DAYTIME).unwrap();
    let grid = SlotGrid::new(SlotSize::DEFAULT);

    let update = grid.apply_code(3, &Selection::default(), code).unwrap();
    assert_eq!(update.written, 0);
    assert!(update.grid.is_empty());
}

#[test]
fn test_out_of_range_selection_rejected_without_mutation() {
    let table = table();
    let code = table.lookup(WEEKDAY_DAYTIME).unwrap();
    let grid = SlotGrid::new(SlotSize::DEFAULT);
    let selection = Selection::from_pairs([(1, 10), (1, 96)]).unwrap();

    let result = grid.apply_code(0, &selection, code);
    assert!(matches!(result, Err(TimesheetError::InvalidGeometry(_))));
    assert!(grid.is_empty());
}

#[test]
fn test_apply_default_code_assigns_weekday_daytime() {
    let table = table();
    let resolver = CodeSlotResolver::new(&table, SlotSize::DEFAULT);
    // 06:00-06:15
    let selection = Selection::from_pairs([(1, 24)]).unwrap();

    let update = SlotGrid::new(SlotSize::DEFAULT)
        .apply_default_code(0, &selection, &resolver, weekday_only)
        .unwrap();
    assert_eq!(update.written, 1);
    let code = update
        .grid
        .code_at(0, SlotCoord::new(monday(), 24))
        .unwrap();
    assert_eq!(code.item_number, WEEKDAY_DAYTIME);
}

#[test]
fn test_apply_default_code_leaves_uncovered_slots_unchanged() {
    let codes = vec![BillingCode {
        item_number: "D".to_string(),
        item_name: "Daytime only".to_string(),
        day_type: DayType::Weekday,
        time_of_day: None,
        applied_to: crate::codes::AppliedTo::minute_range(360, 1080),
        rates: crate::codes::Rates::from_cents(100, 100, 100),
    }];
    let table = BillingCodeTable::new(codes).unwrap();
    let resolver = CodeSlotResolver::new(&table, SlotSize::DEFAULT);

    // an existing assignment outside the daytime range survives the default pass
    let manual = table.lookup("D").unwrap();
    let seeded = SlotGrid::new(SlotSize::DEFAULT)
        .apply_code(0, &Selection::from_pairs([(1, 2)]).unwrap(), manual)
        .unwrap()
        .grid;

    let selection = Selection::from_pairs([(1, 0), (1, 2), (1, 24)]).unwrap();
    let update = seeded
        .apply_default_code(0, &selection, &resolver, weekday_only)
        .unwrap();

    assert_eq!(update.written, 1);
    assert_eq!(update.skipped, 2);
    assert!(update
        .grid
        .code_at(0, SlotCoord::new(monday(), 0))
        .is_none());
    assert!(update
        .grid
        .code_at(0, SlotCoord::new(monday(), 2))
        .is_some());
    assert!(update
        .grid
        .code_at(0, SlotCoord::new(monday(), 24))
        .is_some());
}

#[test]
fn test_apply_default_code_uses_day_type_per_day() {
    let table = table();
    let resolver = CodeSlotResolver::new(&table, SlotSize::DEFAULT);
    let selection = Selection::from_pairs([(1, 50), (6, 50)]).unwrap();
    let by_day = |day: DayIndex| {
        if day == DayIndex::SATURDAY {
            DayType::Saturday
        } else {
            DayType::Weekday
        }
    };

    let grid = SlotGrid::new(SlotSize::DEFAULT)
        .apply_default_code(0, &selection, &resolver, by_day)
        .unwrap()
        .grid;
    assert_eq!(
        grid.code_at(0, SlotCoord::new(DayIndex::SATURDAY, 50))
            .unwrap()
            .item_number,
        SATURDAY
    );
    assert_eq!(
        grid.code_at(0, SlotCoord::new(monday(), 50))
            .unwrap()
            .item_number,
        WEEKDAY_DAYTIME
    );
}

#[test]
fn test_apply_default_rejects_mismatched_resolver() {
    let table = table();
    let resolver = CodeSlotResolver::new(&table, SlotSize::new(30).unwrap());
    let selection = Selection::from_pairs([(1, 24)]).unwrap();
    let result =
        SlotGrid::new(SlotSize::DEFAULT).apply_default_code(0, &selection, &resolver, weekday_only);
    assert!(matches!(result, Err(TimesheetError::InvalidGeometry(_))));
}

#[test]
fn test_weeks_iterate_in_ascending_offset_order() {
    let grid = SlotGrid::new(SlotSize::DEFAULT)
        .ensure_week(3)
        .ensure_week(-1)
        .ensure_week(0);
    let offsets: Vec<WeekOffset> = grid.weeks().map(|(o, _)| o).collect();
    assert_eq!(offsets, vec![-1, 0, 3]);
}

#[test]
fn test_reset_discards_all_weeks() {
    let grid = SlotGrid::new(SlotSize::new(30).unwrap())
        .ensure_week(0)
        .ensure_week(1);
    let reset = grid.reset();
    assert!(reset.is_empty());
    assert_eq!(reset.slot_size(), grid.slot_size());
}

#[test]
fn test_from_days_checks_shape() {
    let ok = WeekColumns::from_days(vec![vec![None; 48]; 7], 48);
    assert!(ok.is_ok());
    assert!(WeekColumns::from_days(vec![vec![None; 48]; 6], 48).is_err());
    assert!(WeekColumns::from_days(vec![vec![None; 47]; 7], 48).is_err());
}

#[test]
fn test_from_weeks_rejects_wrong_resolution() {
    let mut weeks = BTreeMap::new();
    weeks.insert(0, WeekColumns::empty(48));
    assert!(SlotGrid::from_weeks(SlotSize::new(30).unwrap(), weeks.clone()).is_ok());
    assert!(SlotGrid::from_weeks(SlotSize::DEFAULT, weeks).is_err());
}
