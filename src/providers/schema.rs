diesel::table! {
    #[sql_name = "todoItems"]
    todo_items (id) {
        #[sql_name = "ID"]
        id -> Integer,
        #[sql_name = "itemDescription"]
        item_description -> Text,
    }
}
