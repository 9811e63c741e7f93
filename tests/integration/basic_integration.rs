/// Basic integration tests
use habit_streak_tracker::*;
use chrono::NaiveDate;
use serde_json::{json, Value};
use tempfile::TempDir;

#[cfg(test)]
mod basic_integration_tests {
    use super::*;

    fn fixed_today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, 10).unwrap()
    }

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn tool_call(id: u64, tool: &str, arguments: Value) -> String {
        json!({
            "jsonrpc": "2.0",
            "id": id,
            "method": "tools/call",
            "params": { "name": tool, "arguments": arguments }
        })
        .to_string()
    }

    async fn serve_script(server: HabitTrackerServer, lines: &[String]) -> Vec<Value> {
        let mut input = lines.join("\n");
        input.push('\n');
        let mut output = Vec::new();

        let mut mcp = McpServer::new(server).with_clock(fixed_today);
        mcp.serve(input.as_bytes(), &mut output)
            .await
            .expect("serve failed");

        String::from_utf8(output)
            .unwrap()
            .lines()
            .map(|line| serde_json::from_str(line).unwrap())
            .collect()
    }

    #[tokio::test]
    async fn test_server_basic_workflow() {
        let dir = TempDir::new().expect("Failed to create temp dir");
        let db_path = dir.path().join("habits.db");
        let server = HabitTrackerServer::new(db_path.clone())
            .await
            .expect("Failed to create server");

        let script = vec![
            r#"{"jsonrpc":"2.0","id":1,"method":"initialize","params":{"protocolVersion":"2024-11-05","capabilities":{}}}"#.to_string(),
            r#"{"jsonrpc":"2.0","method":"notifications/initialized"}"#.to_string(),
            tool_call(2, "habit_create", json!({
                "id": "H001",
                "name": "Morning Walk",
                "description": "Walk for 20 minutes",
                "frequency": "Daily",
                "reminder_time": "06:30"
            })),
            tool_call(3, "habit_track", json!({ "habit_id": "H001", "date": "2024-01-01" })),
            tool_call(4, "habit_track", json!({ "habit_id": "H001", "date": "2024-01-02" })),
            tool_call(5, "habit_track", json!({ "habit_id": "H001", "date": "2024-01-03" })),
            tool_call(6, "habit_track", json!({ "habit_id": "H001", "date": "2024-01-03" })),
            tool_call(7, "habit_track", json!({ "habit_id": "H001", "date": "2024-01-11" })),
            tool_call(8, "habit_view", json!({ "habit_id": "H001" })),
        ];

        let responses = serve_script(server, &script).await;

        // The notification gets no response
        assert_eq!(responses.len(), 8);
        assert_eq!(responses[0]["id"], json!(1));
        for response in &responses[1..5] {
            assert_eq!(response["result"]["isError"], json!(false), "{}", response);
        }

        let already = &responses[5]["result"];
        assert_eq!(already["isError"], json!(true));
        assert!(already["content"][0]["text"].as_str().unwrap().contains("Already tracked"));

        let future = &responses[6]["result"];
        assert_eq!(future["isError"], json!(true));
        assert!(future["content"][0]["text"].as_str().unwrap().contains("future"));

        let view = responses[7]["result"]["content"][0]["text"].as_str().unwrap();
        assert!(view.contains("Current streak: 3"));

        let storage = SqliteStorage::new(&db_path).expect("Failed to reopen storage");
        let habit = storage.get_habit(&HabitId::parse("H001").unwrap()).unwrap();
        assert_eq!(habit.logs, vec![date("2024-01-03"), date("2024-01-02"), date("2024-01-01")]);
        assert_eq!(habit.start_date, Some(date("2024-01-01")));
    }

    #[tokio::test]
    async fn test_database_persistence() {
        let dir = TempDir::new().expect("Failed to create temp dir");
        let db_path = dir.path().join("habits.db");

        {
            let server = HabitTrackerServer::new(db_path.clone())
                .await
                .expect("Failed to create first server");
            let storage = server.storage();

            create_habit(storage, CreateHabitParams {
                id: Some("H002".to_string()),
                name: "Gym".to_string(),
                description: "Strength training".to_string(),
                frequency: "Mon".to_string(),
                reminder_time: "18:00".to_string(),
            })
            .unwrap();

            for day in ["2024-01-01", "2024-01-08"] {
                track_habit(storage, TrackHabitParams {
                    habit_id: "H002".to_string(),
                    date: Some(date(day)),
                    done: None,
                }, fixed_today(), server.engine())
                .unwrap();
            }
        }

        let server = HabitTrackerServer::new(db_path)
            .await
            .expect("Failed to create second server");
        let habit = server.storage().get_habit(&HabitId::parse("H002").unwrap()).unwrap();

        assert_eq!(habit.frequency, Frequency::Weekly(chrono::Weekday::Mon));
        assert_eq!(habit.logs, vec![date("2024-01-08"), date("2024-01-01")]);
        assert_eq!(habit.latest_streak, 2);
        assert_eq!(habit.longest_streak, 2);
        assert_eq!(habit.start_date, Some(date("2024-01-01")));
    }

    #[tokio::test]
    async fn test_high_water_mark_policy() {
        let dir = TempDir::new().expect("Failed to create temp dir");
        let server = HabitTrackerServer::new(dir.path().join("habits.db"))
            .await
            .expect("Failed to create server")
            .with_streak_policy(LongestStreakPolicy::HighWaterMark);
        assert_eq!(server.engine().policy(), LongestStreakPolicy::HighWaterMark);

        let mut script = vec![tool_call(1, "habit_create", json!({
            "id": "H003",
            "name": "Stretch",
            "description": "",
            "frequency": "Daily",
            "reminder_time": "07:00"
        }))];
        for (id, day) in [(2, "2024-01-01"), (3, "2024-01-02"), (4, "2024-01-03")] {
            script.push(tool_call(id, "habit_track", json!({ "habit_id": "H003", "date": day })));
        }
        script.push(tool_call(5, "habit_track", json!({ "habit_id": "H003", "date": "2024-01-02", "done": false })));

        let responses = serve_script(server, &script).await;
        let text = responses[4]["result"]["content"][0]["text"].as_str().unwrap();

        assert!(text.contains("Current streak: 1 | Longest: 3"), "{}", text);
    }

    #[test]
    fn test_storage_interface() {
        let dir = TempDir::new().expect("Failed to create temp dir");
        let storage = SqliteStorage::new(dir.path().join("habits.db"))
            .expect("Failed to create storage");
        let storage: &dyn HabitStorage = &storage;

        let habit = Habit::new(
            HabitId::parse("H004").unwrap(),
            "Journal".to_string(),
            "One page".to_string(),
            Frequency::Daily,
            "22:00".to_string(),
        )
        .unwrap();
        storage.create_habit(&habit).unwrap();

        let today = fixed_today();
        let engine = StreakEngine::default();
        let tracked = storage
            .modify_habit(&habit.id, &mut |h| {
                apply_tracking(h, today, TrackAction::Done, today, &engine)?;
                Ok(())
            })
            .unwrap();
        assert_eq!(tracked.latest_streak, 1);

        let rejected = storage.modify_habit(&habit.id, &mut |h| {
            apply_tracking(h, today, TrackAction::Done, today, &engine)?;
            Ok(())
        });
        assert!(matches!(rejected, Err(StorageError::Rejected(_))));

        let stored = storage.get_habit(&habit.id).unwrap();
        assert_eq!(stored.logs, vec![today]);
        assert_eq!(storage.list_habits().unwrap().len(), 1);

        storage.delete_habit(&habit.id).unwrap();
        assert!(matches!(
            storage.get_habit(&habit.id),
            Err(StorageError::HabitNotFound { .. })
        ));
    }
}
