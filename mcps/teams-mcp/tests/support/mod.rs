//! In-process fake of the orchestration daemon
//!
//! Serves the HTTP contract from memory on `127.0.0.1:0` and records every
//! request so tests can assert on exact bodies, or on the absence of calls.
//!
//! Follows the real daemon where it matters: task owners are reported as
//! internal member ids, a null or missing `ownerName` leaves the owner
//! unchanged, deleted tasks are hidden, removed members stay listed as
//! inactive, and failed internal writes answer HTTP 400.

#![allow(dead_code)]

use axum::{
    body::Bytes,
    extract::State,
    http::{Method, StatusCode, Uri},
    response::{IntoResponse, Response},
    Json, Router,
};
use serde_json::{json, Value};
use std::collections::BTreeMap;
use std::sync::{Arc, Mutex};

use teams_mcp::config::{Config, DaemonConfig};
use teams_mcp::discovery::{Backend, CapabilitySnapshot};
use teams_mcp::{Session, TeamsMcpServer};

pub const PROJECT_PATH: &str = "/work/proj";

#[derive(Debug, Clone)]
pub struct Recorded {
    pub method: Method,
    pub path: String,
    pub query: Option<String>,
    pub body: Value,
}

#[derive(Debug, Default)]
struct FakeTeam {
    description: String,
    members: Vec<Value>,
    /// Active member name -> internal id
    member_ids: BTreeMap<String, String>,
    statuses: Vec<Value>,
    tasks: Vec<Value>,
    timelines: BTreeMap<String, Vec<Value>>,
}

#[derive(Debug, Default)]
struct DaemonState {
    teams: BTreeMap<String, FakeTeam>,
    requests: Vec<Recorded>,
    /// Paths answered with a fixed status and raw body
    canned: BTreeMap<String, (StatusCode, String)>,
    next_member: usize,
}

type Shared = Arc<Mutex<DaemonState>>;

pub struct FakeDaemon {
    pub url: String,
    state: Shared,
}

impl FakeDaemon {
    pub async fn start() -> Self {
        let state: Shared = Arc::default();
        let app = Router::new().fallback(handle).with_state(state.clone());

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self {
            url: format!("http://{}", addr),
            state,
        }
    }

    /// Session against this daemon with the given backends enabled
    pub fn session(&self, enabled: &[Backend]) -> Session {
        let config = Config {
            daemon: DaemonConfig {
                url: self.url.clone(),
                timeout_secs: 5,
            },
            ..Default::default()
        };
        let caps = CapabilitySnapshot {
            enabled_backends: enabled.to_vec(),
            ..Default::default()
        };
        Session::new(config, caps).unwrap()
    }

    pub fn server(&self, enabled: &[Backend]) -> TeamsMcpServer {
        TeamsMcpServer::new(self.session(enabled))
    }

    pub fn requests(&self) -> Vec<Recorded> {
        self.state.lock().unwrap().requests.clone()
    }

    /// Bodies of every POST to `path`, in order
    pub fn posts_to(&self, path: &str) -> Vec<Value> {
        self.requests()
            .into_iter()
            .filter(|r| r.method == Method::POST && r.path == path)
            .map(|r| r.body)
            .collect()
    }

    /// Answer every request to `path` with `status` and a raw `body`
    pub fn respond(&self, path: &str, status: StatusCode, body: &str) {
        self.state
            .lock()
            .unwrap()
            .canned
            .insert(path.to_string(), (status, body.to_string()));
    }

    pub fn fail(&self, path: &str) {
        self.respond(
            path,
            StatusCode::INTERNAL_SERVER_ERROR,
            r#"{"error":"injected failure"}"#,
        );
    }

    pub fn seed_team(&self, name: &str) {
        let mut state = self.state.lock().unwrap();
        let id = state.allocate_member_id();
        let team = state.teams.entry(name.to_string()).or_default();
        add_member(team, id, "team-lead", "team-lead");
    }

    pub fn seed_member(&self, team: &str, name: &str, alive: bool, last_error: Option<&str>) {
        let mut state = self.state.lock().unwrap();
        let id = state.allocate_member_id();
        let team = state.teams.entry(team.to_string()).or_default();
        add_member(team, id, name, "general");
        if let Some(status) = team
            .statuses
            .iter_mut()
            .find(|s| s["memberName"] == name)
        {
            status["alive"] = json!(alive);
            status["lastError"] = json!(last_error);
        }
    }

    /// Seed a task; `owner` names a member, which is created if needed
    pub fn seed_task(&self, team: &str, id: &str, owner: Option<&str>, status: &str) {
        let mut state = self.state.lock().unwrap();
        let member_id = state.allocate_member_id();
        let team = state.teams.entry(team.to_string()).or_default();
        let owner_id = owner.map(|name| {
            add_member(team, member_id, name, "general");
            team.member_ids[name].clone()
        });
        team.tasks.push(json!({
            "id": id,
            "subject": format!("task {}", id),
            "status": status,
            "owner": owner_id,
        }));
    }

    pub fn seed_timeline(&self, team: &str, member: &str, headlines: &[Option<&str>]) {
        let mut state = self.state.lock().unwrap();
        let team = state.teams.entry(team.to_string()).or_default();
        let entries = headlines
            .iter()
            .enumerate()
            .map(|(i, headline)| {
                json!({
                    "id": format!("evt-{}", i),
                    "eventType": "status",
                    "state": "working",
                    "headline": headline,
                    "payloadJson": null,
                    "createdAtMs": 1000 - i as u64,
                })
            })
            .collect();
        team.timelines.insert(member.to_string(), entries);
    }

    /// Stored task record, including deleted ones
    pub fn task(&self, team: &str, id: &str) -> Option<Value> {
        let state = self.state.lock().unwrap();
        state
            .teams
            .get(team)?
            .tasks
            .iter()
            .find(|t| t["id"] == id)
            .cloned()
    }

    /// Internal id of an active member
    pub fn member_id(&self, team: &str, name: &str) -> Option<String> {
        let state = self.state.lock().unwrap();
        state.teams.get(team)?.member_ids.get(name).cloned()
    }
}

impl DaemonState {
    fn allocate_member_id(&mut self) -> String {
        self.next_member += 1;
        format!("0000-member-{}", self.next_member)
    }
}

fn add_member(team: &mut FakeTeam, id: String, name: &str, agent_type: &str) {
    if team.member_ids.contains_key(name) {
        return;
    }
    team.member_ids.insert(name.to_string(), id);
    team.members.push(json!({
        "name": name,
        "agentType": agent_type,
        "model": "claude-sonnet-4-6",
        "cwd": PROJECT_PATH,
        "isActive": true,
        "color": null,
    }));
    team.statuses.push(json!({
        "memberName": name,
        "alive": true,
        "state": "idle",
        "headline": null,
        "lastHeartbeatMs": 1,
        "lastError": null,
    }));
}

fn summary(name: &str, team: &FakeTeam) -> Value {
    let tasks: Vec<&Value> = team
        .tasks
        .iter()
        .filter(|t| t["status"] != "deleted")
        .collect();
    json!({
        "name": name,
        "description": team.description,
        "createdAt": 1,
        "archived": false,
        "members": team.members,
        "tasks": tasks,
        "conflicts": [],
    })
}

fn error(status: StatusCode, message: &str) -> Response {
    (status, Json(json!({ "error": message }))).into_response()
}

fn rejected(message: &str) -> Response {
    error(StatusCode::BAD_REQUEST, message)
}

fn ok() -> Response {
    Json(json!({ "ok": true })).into_response()
}

async fn handle(State(state): State<Shared>, method: Method, uri: Uri, body: Bytes) -> Response {
    let path = uri.path().to_string();
    let body: Value = serde_json::from_slice(&body).unwrap_or(Value::Null);

    let mut state = state.lock().unwrap();
    state.requests.push(Recorded {
        method: method.clone(),
        path: path.clone(),
        query: uri.query().map(String::from),
        body: body.clone(),
    });

    if let Some((status, canned)) = state.canned.get(&path) {
        return (*status, canned.clone()).into_response();
    }

    let segments: Vec<&str> = path.trim_start_matches('/').split('/').collect();
    let str_field = |key: &str| body[key].as_str().unwrap_or_default().to_string();

    match (method, segments.as_slice()) {
        (Method::GET, ["project", "absolute_path"]) => {
            Json(json!({ "path": PROJECT_PATH })).into_response()
        }
        (Method::GET, ["teams"]) => {
            let teams: Vec<Value> = state.teams.iter().map(|(n, t)| summary(n, t)).collect();
            Json(json!(teams)).into_response()
        }
        (Method::GET, ["teams", team, "snapshot"]) => match state.teams.get(*team) {
            Some(t) => Json(json!({
                "team": summary(team, t),
                "statuses": t.statuses,
            }))
            .into_response(),
            None => error(StatusCode::NOT_FOUND, "not found"),
        },
        (Method::GET, ["teams", _team, "activity"]) => Json(json!([])).into_response(),
        (Method::GET, ["teams", team, "members", member, "timeline"]) => {
            let entries = state
                .teams
                .get(*team)
                .and_then(|t| t.timelines.get(*member))
                .cloned()
                .unwrap_or_default();
            Json(json!(entries)).into_response()
        }
        (Method::POST, ["internal", "teams", "create"]) => {
            let name = str_field("name");
            if state.teams.contains_key(&name) {
                return rejected("team already exists");
            }
            let id = state.allocate_member_id();
            let mut team = FakeTeam {
                description: str_field("description"),
                ..Default::default()
            };
            add_member(&mut team, id, &str_field("leadName"), &str_field("leadAgentType"));
            state.teams.insert(name, team);
            ok()
        }
        (Method::POST, ["internal", "teams", "delete"]) => {
            match state.teams.remove(&str_field("name")) {
                Some(_) => ok(),
                None => rejected("team not found"),
            }
        }
        (Method::POST, ["internal", "teammates", "spawn"]) => {
            let id = state.allocate_member_id();
            match state.teams.get_mut(&str_field("team")) {
                Some(team) => {
                    add_member(team, id, &str_field("name"), &str_field("agentType"));
                    ok()
                }
                None => rejected("team not found"),
            }
        }
        (Method::POST, ["internal", "teammates", "kill"]) => {
            let name = str_field("name");
            let Some(team) = state.teams.get_mut(&str_field("team")) else {
                return rejected("team not found");
            };
            if team.member_ids.remove(&name).is_none() {
                return rejected("member not found");
            }
            for member in team.members.iter_mut() {
                if member["name"] == name.as_str() {
                    member["isActive"] = json!(false);
                }
            }
            for status in team.statuses.iter_mut() {
                if status["memberName"] == name.as_str() {
                    status["alive"] = json!(false);
                    status["state"] = json!("offline");
                }
            }
            ok()
        }
        (Method::POST, ["internal", "messages", "send"]) => ok(),
        (Method::POST, ["internal", "inbox", "read"]) => StatusCode::OK.into_response(),
        (Method::POST, ["internal", "tasks", "create"]) => {
            match state.teams.get_mut(&str_field("team")) {
                Some(team) => {
                    team.tasks.push(json!({
                        "id": body["externalTaskId"],
                        "subject": body["subject"],
                        "status": body["status"],
                        "owner": null,
                    }));
                    ok()
                }
                None => rejected("team not found"),
            }
        }
        (Method::POST, ["internal", "tasks", "update"]) => {
            let id = str_field("externalTaskId");
            let Some(team) = state.teams.get_mut(&str_field("team")) else {
                return rejected("team not found");
            };
            // Null means "unchanged"; a name must resolve to an active member
            let owner_id = match body.get("ownerName").and_then(Value::as_str) {
                Some(name) => match team.member_ids.get(name) {
                    Some(member_id) => Some(member_id.clone()),
                    None => return rejected("owner member not found"),
                },
                None => None,
            };
            let Some(task) = team.tasks.iter_mut().find(|t| t["id"] == id.as_str()) else {
                return rejected("task not found");
            };
            for key in ["subject", "status"] {
                if let Some(value) = body.get(key).filter(|v| !v.is_null()) {
                    task[key] = value.clone();
                }
            }
            if let Some(owner_id) = owner_id {
                task["owner"] = json!(owner_id);
            }
            ok()
        }
        _ => error(StatusCode::NOT_FOUND, "no such route"),
    }
}
