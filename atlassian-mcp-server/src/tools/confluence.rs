//! Confluence tools
//!
//! Spaces and search go through the v1 REST API (`/wiki/rest/api`); pages,
//! comments and page labels through v2 (`/wiki/api/v2`). Label creation is
//! only available on v1.

use super::record::{field, query, ConstValue, Endpoint, ParamSpec, QueryParam, Reply, Source, ToolSpec};

const PAGE_ID: ParamSpec = ParamSpec::string("pageId", "The ID of the page").required();
const LIMIT_25: QueryParam = query("limit", Source::ArgOr("limit", ConstValue::Int(25)));
const START: QueryParam = query("start", Source::ArgOr("start", ConstValue::Int(0)));
const CURSOR: QueryParam = query("cursor", Source::Arg("cursor"));
const CURSOR_PARAM: ParamSpec = ParamSpec::string("cursor", "Cursor for pagination");

const LABEL_ITEM: &[ParamSpec] = &[
    ParamSpec::string("prefix", "Label prefix (usually 'global')").required(),
    ParamSpec::string("name", "Label name").required(),
];

pub static TOOLS: &[ToolSpec] = &[
    ToolSpec::new(
        "confluence_list_spaces",
        "List all Confluence spaces. Returns space keys, names, and types.",
        &[
            ParamSpec::number("limit", "Maximum number of spaces to return (default: 25)"),
            ParamSpec::number("start", "Starting index for pagination (default: 0)"),
        ],
        Endpoint::get("/wiki/rest/api/space").with_query(&[LIMIT_25, START]),
    ),
    ToolSpec::new(
        "confluence_list_pages",
        "List pages in a Confluence space. Returns page titles, IDs, and metadata.",
        &[
            ParamSpec::string("spaceId", "The ID of the space to list pages from"),
            ParamSpec::number(
                "limit",
                "Maximum number of pages to return (default: 50, max: 250)",
            ),
            CURSOR_PARAM,
            ParamSpec::string("status", "Filter by status: current, archived, or trashed")
                .one_of(&["current", "archived", "trashed"]),
        ],
        Endpoint::get("/wiki/api/v2/pages").with_query(&[
            query("spaceId", Source::Arg("spaceId")),
            query("limit", Source::ArgOr("limit", ConstValue::Int(50))),
            query("status", Source::ArgOr("status", ConstValue::Str("current"))),
            CURSOR,
        ]),
    ),
    ToolSpec::new(
        "confluence_create_page",
        "Create a new page in Confluence. Requires space ID, title, and content in storage format.",
        &[
            ParamSpec::string("spaceId", "The ID of the space where the page will be created")
                .required(),
            ParamSpec::string("title", "The title of the new page").required(),
            ParamSpec::string(
                "body",
                "The content of the page in Confluence storage format (HTML-like format)",
            )
            .required(),
            ParamSpec::string("parentId", "Optional parent page ID to create as a child page"),
        ],
        Endpoint::post("/wiki/api/v2/pages").with_body(&[
            field("spaceId", Source::Arg("spaceId")),
            field("status", Source::Const(ConstValue::Str("current"))),
            field("title", Source::Arg("title")),
            field("body.representation", Source::Const(ConstValue::Str("storage"))),
            field("body.value", Source::Arg("body")),
            field("parentId", Source::Arg("parentId")),
        ]),
    ),
    ToolSpec::new(
        "confluence_update_page",
        "Update an existing Confluence page. Requires page ID, new title, and content.",
        &[
            ParamSpec::string("pageId", "The ID of the page to update").required(),
            ParamSpec::string("title", "The new title for the page").required(),
            ParamSpec::string(
                "body",
                "The new content in Confluence storage format (HTML-like format)",
            )
            .required(),
            ParamSpec::number(
                "version",
                "The current version number of the page (incremented automatically)",
            )
            .required(),
        ],
        Endpoint::put("/wiki/api/v2/pages/{pageId}").with_body(&[
            field("id", Source::Arg("pageId")),
            field("status", Source::Const(ConstValue::Str("current"))),
            field("title", Source::Arg("title")),
            field("body.representation", Source::Const(ConstValue::Str("storage"))),
            field("body.value", Source::Arg("body")),
            field("version.number", Source::Incremented("version")),
        ]),
    ),
    ToolSpec::new(
        "confluence_search",
        "Search Confluence content using CQL (Confluence Query Language). Returns matching pages, blog posts, and other content.",
        &[
            ParamSpec::string(
                "cql",
                "CQL query string (e.g., 'type=page AND space=DEV', 'title~\"documentation\"')",
            )
            .required(),
            ParamSpec::number("limit", "Maximum number of results to return (default: 25)"),
            ParamSpec::number("start", "Starting index for pagination (default: 0)"),
            ParamSpec::string(
                "expand",
                "Comma-separated list of properties to expand (e.g., 'body.storage,metadata.labels')",
            ),
        ],
        Endpoint::get("/wiki/rest/api/search").with_query(&[
            query("cql", Source::Arg("cql")),
            LIMIT_25,
            START,
            query("expand", Source::Arg("expand")),
        ]),
    ),
    ToolSpec::new(
        "confluence_get_page",
        "Get a single page by ID with detailed information. Supports single body format.",
        &[
            ParamSpec::string("pageId", "The ID of the page to retrieve").required(),
            ParamSpec::string(
                "bodyFormat",
                "Body format to retrieve: storage, view, atlas_doc_format, export_view, anonymous_export_view, styled_view, editor (default: 'storage')",
            ),
        ],
        Endpoint::get("/wiki/api/v2/pages/{pageId}").with_query(&[query(
            "body-format",
            Source::ArgOr("bodyFormat", ConstValue::Str("storage")),
        )]),
    ),
    ToolSpec::new(
        "confluence_get_page_children",
        "Get child pages of a specific page. Returns a list of direct children.",
        &[
            ParamSpec::string("pageId", "The ID of the parent page").required(),
            ParamSpec::number(
                "limit",
                "Maximum number of children to return (default: 25, max: 250)",
            ),
            CURSOR_PARAM,
            ParamSpec::string("sort", "Sort field (e.g., 'title', 'created-date')"),
        ],
        Endpoint::get("/wiki/api/v2/pages/{pageId}/children").with_query(&[
            LIMIT_25,
            CURSOR,
            query("sort", Source::Arg("sort")),
        ]),
    ),
    ToolSpec::new(
        "confluence_get_comments",
        "Get footer comments on a page. Returns comments with their content and metadata.",
        &[
            PAGE_ID,
            ParamSpec::string(
                "bodyFormat",
                "Body format for comment content: storage, view (default: storage)",
            ),
            ParamSpec::number("limit", "Maximum number of comments to return (default: 25)"),
            CURSOR_PARAM,
        ],
        Endpoint::get("/wiki/api/v2/pages/{pageId}/footer-comments").with_query(&[
            query(
                "body-format",
                Source::ArgOr("bodyFormat", ConstValue::Str("storage")),
            ),
            LIMIT_25,
            CURSOR,
        ]),
    ),
    ToolSpec::new(
        "confluence_get_labels",
        "Get labels attached to a page. Returns label names and prefixes.",
        &[
            PAGE_ID,
            ParamSpec::string(
                "prefix",
                "Filter by label prefix: my, team, global, system (default: returns all)",
            ),
            ParamSpec::number(
                "limit",
                "Maximum number of labels to return (default: 25, max: 250)",
            ),
            CURSOR_PARAM,
            ParamSpec::string("sort", "Sort field"),
        ],
        Endpoint::get("/wiki/api/v2/pages/{pageId}/labels").with_query(&[
            LIMIT_25,
            query("prefix", Source::Arg("prefix")),
            CURSOR,
            query("sort", Source::Arg("sort")),
        ]),
    ),
    ToolSpec::new(
        "confluence_search_user",
        "Search for users using CQL. Returns user information including account ID, display name, and email.",
        &[
            ParamSpec::string(
                "cql",
                "CQL query for user search (e.g., 'user.fullname~\"John\"', 'user.accountid=\"123\"')",
            )
            .required(),
            ParamSpec::number("limit", "Maximum number of users to return (default: 25)"),
            ParamSpec::number("start", "Starting index for pagination (default: 0)"),
        ],
        Endpoint::get("/wiki/rest/api/search/user").with_query(&[
            query("cql", Source::Arg("cql")),
            LIMIT_25,
            START,
        ]),
    ),
    ToolSpec::new(
        "confluence_delete_page",
        "Delete a page. By default, moves to trash. Use purge option for permanent deletion.",
        &[
            ParamSpec::string("pageId", "The ID of the page to delete").required(),
            ParamSpec::boolean(
                "purge",
                "If true, permanently delete the page. If false, move to trash (default: false)",
            ),
        ],
        Endpoint::delete("/wiki/api/v2/pages/{pageId}")
            .with_query(&[query("purge", Source::Flag("purge"))]),
    )
    .reply(Reply::Flagged {
        flag: "purge",
        on: "Page {pageId} deleted successfully (permanently)",
        off: "Page {pageId} deleted successfully (moved to trash)",
    }),
    ToolSpec::new(
        "confluence_add_label",
        "Add one or more labels to a page. Labels help organize and categorize content.",
        &[
            PAGE_ID,
            ParamSpec::object_array(
                "labels",
                "Array of labels to add (e.g., [{'prefix': 'global', 'name': 'important'}])",
                LABEL_ITEM,
            )
            .required(),
        ],
        Endpoint::post("/wiki/rest/api/content/{pageId}/label").with_raw_body("labels"),
    ),
    ToolSpec::new(
        "confluence_add_comment",
        "Add a footer comment to a page. Can be a top-level comment or a reply to another comment.",
        &[
            ParamSpec::string("pageId", "The ID of the page to comment on").required(),
            ParamSpec::string("body", "Comment content in storage format (HTML-like format)")
                .required(),
            ParamSpec::string(
                "parentCommentId",
                "Optional: ID of parent comment to create a reply",
            ),
        ],
        // A reply names only its parent comment; a top-level comment only its page
        Endpoint::post("/wiki/api/v2/footer-comments").with_body(&[
            field("body.representation", Source::Const(ConstValue::Str("storage"))),
            field("body.value", Source::Arg("body")),
            field("parentCommentId", Source::Arg("parentCommentId")),
            field("pageId", Source::ArgUnless("pageId", "parentCommentId")),
        ]),
    ),
];
