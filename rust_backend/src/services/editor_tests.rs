use super::*;
use crate::calendar::{ListedHolidays, WeekendClassifier};
use crate::codes::{BillingCode, DayType};
use crate::db::MemorySessionStore;
use crate::grid::SlotCoord;
use crate::invoice::{MemoryExporter, TemplateLayout};

const WEEKDAY_DAYTIME: &str = "01_011_0107_1_1";
const WEEKDAY_NIGHT: &str = "01_002_0107_1_1";
const SATURDAY: &str = "01_013_0107_1_1";
const PUBLIC_HOLIDAY: &str = "01_012_0107_1_1";

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn monday() -> DayIndex {
    DayIndex::new(1).unwrap()
}

/// Week 0 runs Monday 2026-10-12 to Sunday 2026-10-18.
fn editor_with(store: Arc<dyn SessionStore>) -> TimesheetEditor {
    TimesheetEditor::new(
        Arc::new(BillingCodeTable::ndis_default()),
        Arc::new(WeekendClassifier),
        store,
        WeekCalendar::new(date(2026, 10, 14), monday()),
        SlotSize::DEFAULT,
    )
}

fn editor() -> (TimesheetEditor, MemorySessionStore) {
    let store = MemorySessionStore::new();
    (editor_with(Arc::new(store.clone())), store)
}

struct FailingStore;

impl SessionStore for FailingStore {
    fn read_raw(&self) -> TimesheetResult<Option<String>> {
        Ok(None)
    }

    fn write_raw(&self, _content: &str) -> TimesheetResult<()> {
        Err(TimesheetError::StorageError("disk full".to_string()))
    }

    fn clear(&self) -> TimesheetResult<()> {
        Err(TimesheetError::StorageError("disk full".to_string()))
    }

    fn describe(&self) -> String {
        "failing".to_string()
    }
}

#[test]
fn test_new_editor_shows_week_zero() {
    let (editor, _) = editor();
    assert_eq!(editor.week_offset(), 0);
    assert!(editor.grid().week(0).is_some());
    assert!(editor.selection().is_empty());
}

#[test]
fn test_apply_default_assigns_and_saves() {
    let (mut editor, store) = editor();
    editor
        .select(Selection::from_pairs([(1, 24), (1, 25), (6, 24)]).unwrap())
        .unwrap();

    let outcome = editor.apply_default().unwrap();
    assert_eq!(outcome, EditOutcome::Applied { slots: 3 });
    assert!(editor.selection().is_empty());
    assert!(store.has_content());

    let grid = editor.grid();
    assert_eq!(
        grid.code_at(0, SlotCoord::new(monday(), 24))
            .unwrap()
            .item_number,
        WEEKDAY_DAYTIME
    );
    assert_eq!(
        grid.code_at(0, SlotCoord::new(DayIndex::SATURDAY, 24))
            .unwrap()
            .item_number,
        SATURDAY
    );
}

#[test]
fn test_apply_default_uses_public_holidays() {
    let store = MemorySessionStore::new();
    let mut editor = TimesheetEditor::new(
        Arc::new(BillingCodeTable::ndis_default()),
        Arc::new(ListedHolidays::new([date(2026, 10, 13)], WeekendClassifier)),
        Arc::new(store),
        WeekCalendar::new(date(2026, 10, 14), monday()),
        SlotSize::DEFAULT,
    );
    editor
        .select(Selection::from_pairs([(2, 40)]).unwrap())
        .unwrap();
    editor.apply_default().unwrap();

    let code = editor
        .grid()
        .code_at(0, SlotCoord::new(DayIndex::new(2).unwrap(), 40))
        .unwrap();
    assert_eq!(code.item_number, PUBLIC_HOLIDAY);
    assert_eq!(code.day_type, DayType::PublicHoliday);
}

#[test]
fn test_empty_selection_is_noop() {
    let (mut editor, store) = editor();
    assert_eq!(
        editor.apply_default().unwrap(),
        EditOutcome::NoOp(NoOpReason::EmptySelection)
    );
    assert_eq!(
        editor.delete().unwrap(),
        EditOutcome::NoOp(NoOpReason::EmptySelection)
    );
    assert_eq!(
        editor.apply_specific(Some(SATURDAY)).unwrap(),
        EditOutcome::NoOp(NoOpReason::EmptySelection)
    );
    assert!(!store.has_content());
}

#[test]
fn test_apply_specific_without_code_keeps_selection() {
    let (mut editor, _) = editor();
    editor.select(Selection::day_range(monday(), 0..4)).unwrap();

    assert_eq!(
        editor.apply_specific(None).unwrap(),
        EditOutcome::NoOp(NoOpReason::NoCodeSelected)
    );
    assert_eq!(editor.selection().len(), 4);
    assert_eq!(editor.grid().assigned(), 0);
}

#[test]
fn test_apply_specific_unknown_code_rejected_without_mutation() {
    let (mut editor, store) = editor();
    editor.select(Selection::day_range(monday(), 0..4)).unwrap();

    let result = editor.apply_specific(Some("00_000_0000_0_0"));
    assert!(matches!(result, Err(TimesheetError::NotFound(_))));
    assert_eq!(editor.grid().assigned(), 0);
    assert_eq!(editor.selection().len(), 4);
    assert!(!store.has_content());
}

#[test]
fn test_apply_specific_then_delete() {
    let (mut editor, _) = editor();
    let selection = Selection::day_range(monday(), 0..4);

    editor.select(selection.clone()).unwrap();
    assert!(editor
        .apply_specific(Some(WEEKDAY_NIGHT))
        .unwrap()
        .is_applied());
    assert_eq!(editor.grid().assigned(), 4);

    editor.select(selection).unwrap();
    assert_eq!(editor.delete().unwrap(), EditOutcome::Applied { slots: 4 });
    assert_eq!(editor.grid().assigned(), 0);
}

#[test]
fn test_apply_default_without_any_default_is_noop() {
    let ndis = BillingCodeTable::ndis_default();
    let mut code = BillingCode::clone(ndis.lookup(WEEKDAY_DAYTIME).unwrap());
    code.item_number = "DAY".to_string();
    let table = BillingCodeTable::new(vec![code]).unwrap();
    let mut editor = TimesheetEditor::new(
        Arc::new(table),
        Arc::new(WeekendClassifier),
        Arc::new(MemorySessionStore::new()),
        WeekCalendar::new(date(2026, 10, 14), monday()),
        SlotSize::DEFAULT,
    );

    // 00:00 on a Monday is outside the only code's range
    editor
        .select(Selection::from_pairs([(1, 0)]).unwrap())
        .unwrap();
    assert_eq!(
        editor.apply_default().unwrap(),
        EditOutcome::NoOp(NoOpReason::NoDefaultCode)
    );
    assert_eq!(editor.grid().assigned(), 0);
}

#[test]
fn test_select_rejects_out_of_range_slot() {
    let (mut editor, _) = editor();
    let result = editor.select(Selection::from_pairs([(1, 96)]).unwrap());
    assert!(matches!(result, Err(TimesheetError::InvalidGeometry(_))));
    assert!(editor.selection().is_empty());
}

#[test]
fn test_show_week_clears_selection() {
    let (mut editor, _) = editor();
    editor.select(Selection::day_range(monday(), 0..2)).unwrap();
    editor.show_week(-3).unwrap();
    assert_eq!(editor.week_offset(), -3);
    assert!(editor.selection().is_empty());
    assert!(editor.grid().week(-3).is_some());
}

#[test]
fn test_edits_target_displayed_week() {
    let (mut editor, _) = editor();
    editor.show_week(1).unwrap();
    editor
        .select(Selection::from_pairs([(1, 40)]).unwrap())
        .unwrap();
    editor.apply_default().unwrap();

    let intervals = editor.billed_intervals(true);
    assert_eq!(intervals.len(), 1);
    assert_eq!(
        intervals[0].start,
        date(2026, 10, 19).and_hms_opt(10, 0, 0).unwrap()
    );
}

#[test]
fn test_restore_recovers_saved_session() {
    let store = MemorySessionStore::new();
    let mut first = editor_with(Arc::new(store.clone()));
    first
        .select(Selection::day_range(monday(), 36..44))
        .unwrap();
    first.apply_default().unwrap();

    let mut second = editor_with(Arc::new(store));
    assert!(second.restore());
    assert_eq!(second.grid(), first.grid());
}

#[test]
fn test_restore_with_malformed_session_starts_empty() {
    let store = MemorySessionStore::with_content("{\"weeks\": 12}");
    let mut editor = editor_with(Arc::new(store));
    assert!(!editor.restore());
    assert_eq!(editor.grid().assigned(), 0);
    assert!(editor.grid().week(0).is_some());
}

#[test]
fn test_restore_ignores_other_slot_size() {
    let store = MemorySessionStore::new();
    store
        .save(&SlotGrid::new(SlotSize::new(30).unwrap()).ensure_week(0))
        .unwrap();
    let mut editor = editor_with(Arc::new(store));
    assert!(!editor.restore());
    assert_eq!(editor.grid().slot_size(), SlotSize::DEFAULT);
}

#[test]
fn test_restore_rejects_weeks_outside_date_range() {
    let table = BillingCodeTable::ndis_default();
    let code = table.lookup(SATURDAY).unwrap();
    let grid = SlotGrid::new(SlotSize::DEFAULT)
        .apply_code(0, &Selection::day_range(DayIndex::SATURDAY, 0..2), code)
        .unwrap()
        .grid
        .apply_code(
            100_000_000,
            &Selection::day_range(DayIndex::SATURDAY, 0..1),
            code,
        )
        .unwrap()
        .grid;
    let store = MemorySessionStore::new();
    store.save(&grid).unwrap();

    let mut editor = editor_with(Arc::new(store));
    assert!(!editor.restore());
    assert_eq!(editor.grid().assigned(), 0);
    assert!(editor.billed_intervals(true).is_empty());
    assert!(editor.summary(RateTier::National, true).is_empty());
}

#[test]
fn test_show_week_rejects_offset_outside_date_range() {
    let (mut editor, store) = editor();
    for offset in [i64::MAX, i64::MIN, 100_000_000] {
        let result = editor.show_week(offset);
        assert!(matches!(result, Err(TimesheetError::InvalidGeometry(_))));
        assert_eq!(editor.week_offset(), 0);
        assert!(editor.grid().week(offset).is_none());
    }

    editor
        .select(Selection::from_pairs([(1, 40)]).unwrap())
        .unwrap();
    assert_eq!(
        editor.apply_default().unwrap(),
        EditOutcome::Applied { slots: 1 }
    );
    assert!(store.has_content());
    assert_eq!(editor.billed_intervals(true).len(), 1);
}

#[test]
fn test_repeated_coordinates_count_once() {
    let (mut editor, _) = editor();
    editor
        .select(Selection::from_pairs([(2, 5), (2, 5)]).unwrap())
        .unwrap();
    assert_eq!(
        editor.apply_specific(Some(WEEKDAY_NIGHT)).unwrap(),
        EditOutcome::Applied { slots: 1 }
    );

    editor
        .select(Selection::from_pairs([(2, 5), (2, 5), (2, 6)]).unwrap())
        .unwrap();
    assert_eq!(editor.delete().unwrap(), EditOutcome::Applied { slots: 2 });
    assert_eq!(editor.grid().assigned(), 0);
}

#[test]
fn test_reset_clears_grid_and_store() {
    let (mut editor, store) = editor();
    editor.show_week(2).unwrap();
    editor.select(Selection::day_range(monday(), 0..4)).unwrap();
    editor.apply_specific(Some(WEEKDAY_NIGHT)).unwrap();
    assert!(store.has_content());

    editor.reset().unwrap();
    assert_eq!(editor.grid().assigned(), 0);
    assert_eq!(editor.grid().week_count(), 1);
    assert!(!store.has_content());
}

#[test]
fn test_failed_save_discards_edit() {
    let mut editor = editor_with(Arc::new(FailingStore));
    editor.select(Selection::day_range(monday(), 0..4)).unwrap();

    let result = editor.apply_specific(Some(WEEKDAY_NIGHT));
    assert!(matches!(result, Err(TimesheetError::StorageError(_))));
    assert_eq!(editor.grid().assigned(), 0);
    assert_eq!(editor.selection().len(), 4);
}

#[test]
fn test_summary_and_default_details() {
    let (mut editor, _) = editor();
    editor
        .select(Selection::day_range(monday(), 36..44))
        .unwrap();
    editor.apply_default().unwrap();

    let summary = editor.summary(RateTier::National, true);
    assert_eq!(summary.lines.len(), 1);
    assert_eq!(summary.lines[0].start_time, "09:00");
    assert_eq!(summary.lines[0].end_time, "11:00");

    let details = editor.default_details(["Invoice 3"], true);
    assert_eq!(details.sheet_title, "Invoice 4");
    assert_eq!(details.format_period(), "12/10/2026 - 12/10/2026");
}

#[tokio::test]
async fn test_export_hands_intervals_to_exporter() {
    let (mut editor, _) = editor();
    editor
        .select(Selection::day_range(monday(), 36..44))
        .unwrap();
    editor.apply_default().unwrap();

    let layout: TemplateLayout = crate::invoice::template::sample_layout();
    let template = TemplateDescriptor::new("Standard", layout).unwrap();
    let details = editor.default_details([], true);
    let exporter = MemoryExporter::new();

    let receipt = editor
        .export(&exporter, template, details, RateTier::Remote, true)
        .await
        .unwrap();
    assert_eq!(receipt.lines_written, 1);

    let exported = exporter.exported();
    assert_eq!(exported.len(), 1);
    assert_eq!(exported[0].rate_tier, RateTier::Remote);
    assert_eq!(exported[0].intervals, editor.billed_intervals(true));
}
