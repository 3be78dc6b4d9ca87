//! Jira tools
//!
//! Platform operations use REST v3 (`/rest/api/3`); boards, sprints, backlog
//! and epics use the Agile API (`/rest/agile/1.0`).

use super::record::{
    field, query, Bind, BodyField, ConstValue, Dispatch, Endpoint, ParamSpec, QueryParam, Source,
    ToolSpec,
};

const ISSUE_KEY: ParamSpec = ParamSpec::string("issueKey", "The issue key (e.g., 'PROJ-123')").required();
const BOARD_ID: ParamSpec = ParamSpec::number("boardId", "The board ID").required();
const START_AT: ParamSpec = ParamSpec::number("startAt", "Starting index for pagination (default: 0)");
const FIELDS: ParamSpec = ParamSpec::string_array("fields", "Specific fields to return");

const MAX_50: QueryParam = query("maxResults", Source::ArgOr("maxResults", ConstValue::Int(50)));
const START_AT_0: QueryParam = query("startAt", Source::ArgOr("startAt", ConstValue::Int(0)));
const FIELDS_LIST: QueryParam = query("fields", Source::Arg("fields"));
const JQL: QueryParam = query("jql", Source::Arg("jql"));

const DEFAULT_SEARCH_FIELDS: ConstValue =
    ConstValue::StrList(&["summary", "status", "assignee", "created", "updated"]);

/// Issue fields shared by single and bulk creation
const ISSUE_FIELDS: &[BodyField] = &[
    field("fields.project", Source::Keyed("projectKey", "key")),
    field("fields.issuetype", Source::Keyed("issueType", "name")),
    field("fields.summary", Source::Arg("summary")),
    field("fields.description", Source::Adf("description")),
    field("fields.priority", Source::Keyed("priority", "name")),
    field("fields.labels", Source::NonEmpty("labels")),
    field("fields.assignee", Source::Keyed("assignee", "accountId")),
    field("fields.parent", Source::Keyed("parentKey", "key")),
];

const ISSUE_ITEM: &[ParamSpec] = &[
    ParamSpec::string("projectKey", "").required(),
    ParamSpec::string("issueType", "").required(),
    ParamSpec::string("summary", "").required(),
    ParamSpec::string("description", ""),
    ParamSpec::string("priority", ""),
    ParamSpec::string_array("labels", ""),
    ParamSpec::string("assignee", ""),
    ParamSpec::string("parentKey", ""),
];

const VERSION_BODY: &[BodyField] = &[
    field("name", Source::Arg("name")),
    field("project", Source::Arg("projectKey")),
    field("released", Source::ArgOr("released", ConstValue::Bool(false))),
    field("description", Source::Arg("description")),
    field("releaseDate", Source::Arg("releaseDate")),
];

const VERSION_ITEM: &[ParamSpec] = &[
    ParamSpec::string("name", "").required(),
    ParamSpec::string("description", ""),
    ParamSpec::string("releaseDate", ""),
    ParamSpec::boolean("released", ""),
];

pub static TOOLS: &[ToolSpec] = &[
    ToolSpec::new(
        "jira_list_projects",
        "List all Jira projects accessible to the user. Returns project keys, names, and types.",
        &[
            ParamSpec::number("maxResults", "Maximum number of projects to return (default: 50)"),
            START_AT,
        ],
        Endpoint::get("/rest/api/3/project/search").with_query(&[MAX_50, START_AT_0]),
    ),
    ToolSpec::new(
        "jira_search_issues",
        "Search for Jira issues using JQL (Jira Query Language). Returns issue keys, summaries, and fields.",
        &[
            ParamSpec::string("jql", "JQL query string (e.g., 'project = PROJ AND status = Open')")
                .required(),
            ParamSpec::number(
                "maxResults",
                "Maximum number of issues to return (default: 50, max: 5000)",
            ),
            ParamSpec::string("nextPageToken", "Token for pagination to get next page of results"),
            ParamSpec::string_array(
                "fields",
                "Specific fields to return (default: summary, status, assignee, created, updated)",
            ),
        ],
        // /rest/api/3/search is deprecated in favour of the token-paginated search/jql
        Endpoint::post("/rest/api/3/search/jql").with_body(&[
            field("jql", Source::Arg("jql")),
            field("maxResults", Source::ArgOr("maxResults", ConstValue::Int(50))),
            field("fields", Source::ArgOr("fields", DEFAULT_SEARCH_FIELDS)),
            field("nextPageToken", Source::Arg("nextPageToken")),
        ]),
    ),
    ToolSpec::new(
        "jira_create_issue",
        "Create a new Jira issue. Requires project key, issue type, and summary.",
        &[
            ParamSpec::string("projectKey", "The key of the project (e.g., 'PROJ')").required(),
            ParamSpec::string("issueType", "The issue type name (e.g., 'Task', 'Bug', 'Story')")
                .required(),
            ParamSpec::string("summary", "Brief summary of the issue").required(),
            ParamSpec::string("description", "Detailed description of the issue"),
            ParamSpec::string("priority", "Priority name (e.g., 'High', 'Medium', 'Low')"),
            ParamSpec::string_array("labels", "Array of labels to add to the issue"),
            ParamSpec::string("assignee", "Account ID of the assignee"),
            ParamSpec::string("parentKey", "Parent issue key for sub-tasks or epic children"),
        ],
        Endpoint::post("/rest/api/3/issue").with_body(ISSUE_FIELDS),
    ),
    ToolSpec::new(
        "jira_update_issue",
        "Update an existing Jira issue. Can modify summary, description, status, and other fields.",
        &[
            ISSUE_KEY,
            ParamSpec::string("summary", "New summary for the issue"),
            ParamSpec::string("description", "New description for the issue"),
            ParamSpec::string("priority", "New priority name"),
            ParamSpec::string_array("labels", "New labels (replaces existing)"),
            ParamSpec::string("assignee", "Account ID of the new assignee"),
            ParamSpec::string("parentKey", "New parent issue key"),
        ],
        // An explicit empty label list clears the labels, so labels use Arg here
        Endpoint::put("/rest/api/3/issue/{issueKey}").with_body(&[
            field("fields", Source::Const(ConstValue::EmptyObject)),
            field("fields.summary", Source::Arg("summary")),
            field("fields.description", Source::Adf("description")),
            field("fields.priority", Source::Keyed("priority", "name")),
            field("fields.labels", Source::Arg("labels")),
            field("fields.assignee", Source::Keyed("assignee", "accountId")),
            field("fields.parent", Source::Keyed("parentKey", "key")),
        ]),
    )
    .message("Issue {issueKey} updated successfully"),
    ToolSpec::new(
        "jira_delete_issue",
        "Delete a Jira issue. This action cannot be undone unless the issue is in the trash.",
        &[
            ParamSpec::string("issueKey", "The issue key to delete (e.g., 'PROJ-123')").required(),
            ParamSpec::boolean(
                "deleteSubtasks",
                "Whether to delete subtasks if they exist (default: false)",
            ),
        ],
        Endpoint::delete("/rest/api/3/issue/{issueKey}")
            .with_query(&[query("deleteSubtasks", Source::Flag("deleteSubtasks"))]),
    )
    .message("Issue {issueKey} deleted successfully"),
    ToolSpec::new(
        "jira_get_issue",
        "Get detailed information about a single Jira issue by its key. Returns all issue fields.",
        &[
            ISSUE_KEY,
            ParamSpec::string_array("fields", "Specific fields to return (default: all fields)"),
            ParamSpec::string_array(
                "expand",
                "Additional properties to expand (e.g., 'changelog', 'renderedFields')",
            ),
        ],
        Endpoint::get("/rest/api/3/issue/{issueKey}")
            .with_query(&[FIELDS_LIST, query("expand", Source::Arg("expand"))]),
    ),
    ToolSpec::new(
        "jira_get_transitions",
        "Get available workflow transitions for an issue. Returns transition IDs and names that can be used to change issue status.",
        &[ISSUE_KEY],
        Endpoint::get("/rest/api/3/issue/{issueKey}/transitions"),
    ),
    ToolSpec::new(
        "jira_transition_issue",
        "Transition an issue to a new status. Requires a valid transition ID from jira_get_transitions.",
        &[
            ISSUE_KEY,
            ParamSpec::string("transitionId", "The ID of the transition to perform").required(),
            ParamSpec::string("comment", "Optional comment to add when transitioning"),
        ],
        Endpoint::post("/rest/api/3/issue/{issueKey}/transitions").with_body(&[
            field("transition.id", Source::Arg("transitionId")),
            field("update.comment.0.add.body", Source::Adf("comment")),
        ]),
    )
    .message("Issue {issueKey} transitioned successfully"),
    ToolSpec::new(
        "jira_add_comment",
        "Add a comment to a Jira issue. Comments support plain text.",
        &[ISSUE_KEY, ParamSpec::string("body", "The comment text").required()],
        Endpoint::post("/rest/api/3/issue/{issueKey}/comment")
            .with_body(&[field("body", Source::Adf("body"))]),
    ),
    ToolSpec::new(
        "jira_get_worklog",
        "Get all worklog entries for an issue. Returns time spent, author, and dates.",
        &[
            ISSUE_KEY,
            ParamSpec::number("maxResults", "Maximum number of worklogs to return (default: 1000)"),
            START_AT,
        ],
        Endpoint::get("/rest/api/3/issue/{issueKey}/worklog").with_query(&[
            query("maxResults", Source::ArgOr("maxResults", ConstValue::Int(1000))),
            START_AT_0,
        ]),
    ),
    ToolSpec::new(
        "jira_add_worklog",
        "Add a worklog entry to an issue. Records time spent working on the issue.",
        &[
            ISSUE_KEY,
            ParamSpec::number("timeSpentSeconds", "Time spent in seconds (e.g., 3600 for 1 hour)")
                .required(),
            ParamSpec::string("comment", "Optional description of work done"),
            ParamSpec::string(
                "started",
                "Start time in ISO 8601 format (e.g., '2024-01-15T10:00:00.000+0000')",
            ),
        ],
        Endpoint::post("/rest/api/3/issue/{issueKey}/worklog").with_body(&[
            field("timeSpentSeconds", Source::Arg("timeSpentSeconds")),
            field("comment", Source::Adf("comment")),
            field("started", Source::Arg("started")),
        ]),
    ),
    ToolSpec::new(
        "jira_get_issue_link_types",
        "Get all available issue link types. Returns link type names, inward/outward descriptions.",
        &[],
        Endpoint::get("/rest/api/3/issueLinkType"),
    ),
    ToolSpec::new(
        "jira_create_issue_link",
        "Create a link between two issues. Use jira_get_issue_link_types to see available link types.",
        &[
            ParamSpec::string("type", "The link type name (e.g., 'Blocks', 'Relates')").required(),
            ParamSpec::string("inwardIssue", "The inward issue key (e.g., 'PROJ-123')").required(),
            ParamSpec::string("outwardIssue", "The outward issue key (e.g., 'PROJ-456')")
                .required(),
            ParamSpec::string("comment", "Optional comment about the link"),
        ],
        Endpoint::post("/rest/api/3/issueLink").with_body(&[
            field("type", Source::Keyed("type", "name")),
            field("inwardIssue", Source::Keyed("inwardIssue", "key")),
            field("outwardIssue", Source::Keyed("outwardIssue", "key")),
            field("comment.body", Source::Adf("comment")),
        ]),
    )
    .message("Issue link created successfully between {inwardIssue} and {outwardIssue}"),
    ToolSpec::new(
        "jira_get_project_versions",
        "Get all versions/releases for a project. Returns version names, release dates, and status.",
        &[ParamSpec::string("projectKey", "The project key (e.g., 'PROJ')").required()],
        Endpoint::get("/rest/api/3/project/{projectKey}/versions"),
    ),
    ToolSpec::new(
        "jira_create_version",
        "Create a new version/release in a project. Used for release management.",
        &[
            ParamSpec::string("projectKey", "The project key (e.g., 'PROJ')").required(),
            ParamSpec::string("name", "Version name (e.g., 'v1.0.0', 'Release 2024.1')").required(),
            ParamSpec::string("description", "Optional version description"),
            ParamSpec::string("releaseDate", "Optional release date in YYYY-MM-DD format"),
            ParamSpec::boolean("released", "Whether the version is released (default: false)"),
        ],
        Endpoint::post("/rest/api/3/version").with_body(VERSION_BODY),
    ),
    ToolSpec::new(
        "jira_get_project_issues",
        "Get all issues for a specific project. Returns issues ordered by creation date.",
        &[
            ParamSpec::string("projectKey", "The project key (e.g., 'PROJ')").required(),
            ParamSpec::number("maxResults", "Maximum number of issues to return (default: 50)"),
            START_AT,
            FIELDS,
        ],
        // search/jql paginates by token, so startAt is accepted but not forwarded
        Endpoint::post("/rest/api/3/search/jql").with_body(&[
            field(
                "jql",
                Source::Template("project = {projectKey} ORDER BY created DESC"),
            ),
            field("maxResults", Source::ArgOr("maxResults", ConstValue::Int(50))),
            field("fields", Source::ArgOr("fields", DEFAULT_SEARCH_FIELDS)),
        ]),
    ),
    ToolSpec::new(
        "jira_search_fields",
        "Search for custom fields in Jira. Returns field IDs, names, and schemas.",
        &[
            ParamSpec::string("query", "Query string to search field names"),
            ParamSpec::number("maxResults", "Maximum number of fields to return (default: 50)"),
            START_AT,
        ],
        Endpoint::get("/rest/api/3/field/search").with_query(&[
            MAX_50,
            START_AT_0,
            query("query", Source::Arg("query")),
        ]),
    ),
    ToolSpec::new(
        "jira_get_agile_boards",
        "Get all agile boards. Can filter by project. Returns board names and types.",
        &[
            ParamSpec::string("projectKeyOrId", "Filter by project key or ID"),
            ParamSpec::number("maxResults", "Maximum number of boards to return (default: 50)"),
            START_AT,
        ],
        Endpoint::get("/rest/agile/1.0/board").with_query(&[
            MAX_50,
            START_AT_0,
            query("projectKeyOrId", Source::Arg("projectKeyOrId")),
        ]),
    ),
    ToolSpec::new(
        "jira_create_board",
        "Create a new agile board (Scrum or Kanban). The board can be created for a specific project or based on a filter.",
        &[
            ParamSpec::string("name", "Board name").required(),
            ParamSpec::string("type", "Board type: 'scrum' or 'kanban'")
                .required()
                .one_of(&["scrum", "kanban"]),
            ParamSpec::string("projectKeyOrId", "Project key or ID to associate with the board")
                .required(),
            ParamSpec::number(
                "filterId",
                "Optional: Filter ID to base the board on (instead of project)",
            ),
        ],
        Endpoint::post("/rest/agile/1.0/board").with_body(&[
            field("name", Source::Arg("name")),
            field("type", Source::Arg("type")),
            field("filterId", Source::Arg("filterId")),
        ]),
    )
    .dispatch(Dispatch::Chained {
        when_missing: "filterId",
        prelude: Endpoint::post("/rest/api/3/filter").with_body(&[
            field("name", Source::Template("Filter for {name}")),
            field(
                "jql",
                Source::Template("project = {projectKeyOrId} ORDER BY Rank ASC"),
            ),
            field(
                "description",
                Source::Template("Automatically created filter for board {name}"),
            ),
        ]),
        bind_from: "id",
    }),
    ToolSpec::new(
        "jira_update_board",
        "Update an existing board. Can modify board name or filter. Note: Cannot change board type.",
        &[
            ParamSpec::number("boardId", "The board ID to update").required(),
            ParamSpec::string("name", "New board name"),
            ParamSpec::number("filterId", "New filter ID"),
        ],
        Endpoint::put("/rest/agile/1.0/board/{boardId}/configuration").with_body(&[
            field("name", Source::Arg("name")),
            field("filterId", Source::Arg("filterId")),
        ]),
    ),
    ToolSpec::new(
        "jira_delete_board",
        "Delete a board. Warning: This is permanent and cannot be undone. All board configuration will be lost.",
        &[ParamSpec::number("boardId", "The board ID to delete").required()],
        Endpoint::delete("/rest/agile/1.0/board/{boardId}"),
    )
    .message("Board {boardId} deleted successfully"),
    ToolSpec::new(
        "jira_get_board_issues",
        "Get all issues on a specific board. Can filter with JQL. Returns issue keys and summaries.",
        &[
            BOARD_ID,
            ParamSpec::number("maxResults", "Maximum number of issues to return (default: 50)"),
            START_AT,
            ParamSpec::string("jql", "Optional JQL filter for issues"),
        ],
        Endpoint::get("/rest/agile/1.0/board/{boardId}/issue").with_query(&[MAX_50, START_AT_0, JQL]),
    ),
    ToolSpec::new(
        "jira_get_sprints_from_board",
        "Get all sprints from a board. Can filter by state (active, future, closed). Returns sprint names and dates.",
        &[
            BOARD_ID,
            ParamSpec::number("maxResults", "Maximum number of sprints to return (default: 50)"),
            START_AT,
            ParamSpec::string("state", "Filter by sprint state: active, future, closed"),
        ],
        Endpoint::get("/rest/agile/1.0/board/{boardId}/sprint").with_query(&[
            MAX_50,
            START_AT_0,
            query("state", Source::Arg("state")),
        ]),
    ),
    ToolSpec::new(
        "jira_get_sprint_issues",
        "Get all issues in a specific sprint. Returns issue details and status.",
        &[
            ParamSpec::number("sprintId", "The sprint ID").required(),
            ParamSpec::number("maxResults", "Maximum number of issues to return (default: 50)"),
            START_AT,
            FIELDS,
        ],
        Endpoint::get("/rest/agile/1.0/sprint/{sprintId}/issue")
            .with_query(&[MAX_50, START_AT_0, FIELDS_LIST]),
    ),
    ToolSpec::new(
        "jira_batch_get_changelogs",
        "Batch get changelogs for multiple issues. Returns complete change history for each issue.",
        &[ParamSpec::string_array(
            "issueKeys",
            "Array of issue keys (e.g., ['PROJ-1', 'PROJ-2'])",
        )
        .required()],
        Endpoint::get("/rest/api/3/issue/{issueKey}")
            .with_query(&[query("expand", Source::Const(ConstValue::Str("changelog")))]),
    )
    .dispatch(Dispatch::FanOut {
        over: "issueKeys",
        bind: Bind::As("issueKey"),
        concurrent: true,
    }),
    ToolSpec::new(
        "jira_get_user_profile",
        "Get user profile information by account ID. Returns display name, email, and avatar.",
        &[ParamSpec::string("accountId", "The user's account ID").required()],
        Endpoint::get("/rest/api/3/user").with_query(&[query("accountId", Source::Arg("accountId"))]),
    ),
    ToolSpec::new(
        "jira_download_attachments",
        "Get attachment information including download URL. Returns attachment metadata and content URL.",
        &[ParamSpec::string("attachmentId", "The attachment ID").required()],
        Endpoint::get("/rest/api/3/attachment/{attachmentId}"),
    ),
    ToolSpec::new(
        "jira_batch_create_issues",
        "Create multiple issues in a single request. More efficient than creating one at a time.",
        &[ParamSpec::object_array("issues", "Array of issues to create", ISSUE_ITEM).required()],
        Endpoint::post("/rest/api/3/issue/bulk").with_body(&[field(
            "issueUpdates",
            Source::EachOf {
                arg: "issues",
                fields: ISSUE_FIELDS,
            },
        )]),
    ),
    ToolSpec::new(
        "jira_link_to_epic",
        "Link multiple issues to an epic. Creates Epic-Story links between issues and epic.",
        &[
            ParamSpec::string("epicKey", "The epic issue key (e.g., 'PROJ-123')").required(),
            ParamSpec::string_array("issueKeys", "Array of issue keys to link to the epic")
                .required(),
        ],
        Endpoint::post("/rest/api/3/issueLink").with_body(&[
            field("type.name", Source::Const(ConstValue::Str("Epic-Story Link"))),
            field("inwardIssue", Source::Keyed("issueKey", "key")),
            field("outwardIssue", Source::Keyed("epicKey", "key")),
        ]),
    )
    .dispatch(Dispatch::FanOut {
        over: "issueKeys",
        bind: Bind::As("issueKey"),
        concurrent: false,
    })
    .message("Successfully linked {#issueKeys} issues to epic {epicKey}"),
    ToolSpec::new(
        "jira_create_sprint",
        "Create a new sprint on a board. Requires board ID, sprint name, and optional dates.",
        &[
            ParamSpec::number("boardId", "The board ID where sprint will be created").required(),
            ParamSpec::string("name", "Sprint name (e.g., 'Sprint 1', 'Q1 Sprint')").required(),
            ParamSpec::string(
                "startDate",
                "Start date in ISO 8601 format (e.g., '2024-01-15T10:00:00.000Z')",
            ),
            ParamSpec::string("endDate", "End date in ISO 8601 format"),
            ParamSpec::string("goal", "Sprint goal description"),
        ],
        Endpoint::post("/rest/agile/1.0/sprint").with_body(&[
            field("name", Source::Arg("name")),
            field("originBoardId", Source::Arg("boardId")),
            field("startDate", Source::Arg("startDate")),
            field("endDate", Source::Arg("endDate")),
            field("goal", Source::Arg("goal")),
        ]),
    ),
    ToolSpec::new(
        "jira_update_sprint",
        "Update an existing sprint. Can modify name, dates, goal, or state (start/close sprint).",
        &[
            ParamSpec::number("sprintId", "The sprint ID to update").required(),
            ParamSpec::string("name", "New sprint name"),
            ParamSpec::string("startDate", "New start date in ISO 8601 format"),
            ParamSpec::string("endDate", "New end date in ISO 8601 format"),
            ParamSpec::string("goal", "New sprint goal"),
            ParamSpec::string("state", "Sprint state: active, future, closed"),
        ],
        Endpoint::put("/rest/agile/1.0/sprint/{sprintId}").with_body(&[
            field("name", Source::Arg("name")),
            field("startDate", Source::Arg("startDate")),
            field("endDate", Source::Arg("endDate")),
            field("goal", Source::Arg("goal")),
            field("state", Source::Arg("state")),
        ]),
    ),
    ToolSpec::new(
        "jira_delete_sprint",
        "Delete a sprint. Note: Can only delete sprints that have not been started (future state). Cannot delete active or closed sprints.",
        &[ParamSpec::number("sprintId", "The sprint ID to delete").required()],
        Endpoint::delete("/rest/agile/1.0/sprint/{sprintId}"),
    )
    .message("Sprint {sprintId} deleted successfully"),
    ToolSpec::new(
        "jira_remove_issue_link",
        "Remove/delete a link between two issues. Requires the link ID.",
        &[ParamSpec::string("linkId", "The issue link ID to remove").required()],
        Endpoint::delete("/rest/api/3/issueLink/{linkId}"),
    )
    .message("Issue link {linkId} removed successfully"),
    ToolSpec::new(
        "jira_move_issues_to_sprint",
        "Move issues to a sprint. This is essential for sprint planning - add issues from backlog to sprint.",
        &[
            ParamSpec::number("sprintId", "The sprint ID to move issues to").required(),
            ParamSpec::string_array(
                "issues",
                "Array of issue keys to move (e.g., ['PROJ-1', 'PROJ-2'])",
            )
            .required(),
        ],
        Endpoint::post("/rest/agile/1.0/sprint/{sprintId}/issue")
            .with_body(&[field("issues", Source::Arg("issues"))]),
    )
    .message("Successfully moved {#issues} issues to sprint {sprintId}"),
    ToolSpec::new(
        "jira_get_backlog_issues",
        "Get all issues in the backlog for a board. Returns issues that are not assigned to any sprint.",
        &[
            BOARD_ID,
            ParamSpec::number("maxResults", "Maximum number of issues to return (default: 50)"),
            START_AT,
            ParamSpec::string("jql", "Additional JQL filter"),
            FIELDS,
        ],
        Endpoint::get("/rest/agile/1.0/board/{boardId}/backlog")
            .with_query(&[MAX_50, START_AT_0, JQL, FIELDS_LIST]),
    ),
    ToolSpec::new(
        "jira_rank_backlog_issues",
        "Rank/reorder issues in the backlog. Used to adjust issue priority order before sprint planning. Specify either rankBeforeIssue or rankAfterIssue to position the issues.",
        &[
            ParamSpec::string_array(
                "issueKeys",
                "Array of issue keys to rank (e.g., ['PROJ-1', 'PROJ-2'])",
            )
            .required(),
            ParamSpec::string(
                "rankBeforeIssue",
                "Rank the issues before this issue key (e.g., 'PROJ-10')",
            ),
            ParamSpec::string(
                "rankAfterIssue",
                "Rank the issues after this issue key (e.g., 'PROJ-5')",
            ),
        ],
        // rankBeforeIssue wins when both are given
        Endpoint::put("/rest/agile/1.0/issue/rank").with_body(&[
            field("issues.0", Source::Arg("issueKey")),
            field("rankBeforeIssue", Source::Arg("rankBeforeIssue")),
            field(
                "rankAfterIssue",
                Source::ArgUnless("rankAfterIssue", "rankBeforeIssue"),
            ),
        ]),
    )
    .dispatch(Dispatch::FanOut {
        over: "issueKeys",
        bind: Bind::As("issueKey"),
        concurrent: false,
    })
    .message("Successfully ranked {#issueKeys} issues in backlog"),
    ToolSpec::new(
        "jira_get_epic_issues",
        "Get all issues (stories, tasks, bugs) that belong to an epic. Returns child issues of the epic.",
        &[
            ParamSpec::string("epicIdOrKey", "The epic ID or key (e.g., 'PROJ-123')").required(),
            ParamSpec::number("maxResults", "Maximum number of issues to return (default: 50)"),
            START_AT,
            FIELDS,
        ],
        Endpoint::get("/rest/agile/1.0/epic/{epicIdOrKey}/issue")
            .with_query(&[MAX_50, START_AT_0, FIELDS_LIST]),
    ),
    ToolSpec::new(
        "jira_batch_create_versions",
        "Create multiple versions/releases in a project. More efficient than creating one at a time.",
        &[
            ParamSpec::string("projectKey", "The project key").required(),
            ParamSpec::object_array("versions", "Array of versions to create", VERSION_ITEM)
                .required(),
        ],
        Endpoint::post("/rest/api/3/version").with_body(VERSION_BODY),
    )
    .dispatch(Dispatch::FanOut {
        over: "versions",
        bind: Bind::Merge,
        concurrent: true,
    }),
];
