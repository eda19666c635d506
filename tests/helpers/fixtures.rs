//! Common LookML sources.

pub const ORDERS_VIEW: &str = "view: orders {
  sql_table_name: public.orders ;;

  dimension: id {
    primary_key: yes
    type: number
    sql: ${TABLE}.id ;;
  }

  dimension: user_id {
    type: number
    sql: ${TABLE}.user_id ;;
  }

  dimension_group: created {
    type: time
    timeframes: [date, week, month]
    sql: ${TABLE}.created_at ;;
  }

  measure: count {
    type: count
    drill_fields: [id, users.name]
  }

  measure: total {
    type: sum
    sql: ${id} ;;
  }
}
";

pub const USERS_VIEW: &str = "view: users {
  dimension: id {
    primary_key: yes
    type: number
    sql: ${TABLE}.id ;;
  }

  dimension: name {
    type: string
    sql: ${TABLE}.name ;;
  }
}
";

pub const SHOP_MODEL: &str = "connection: \"warehouse\"
include: \"*.view.lkml\"

explore: orders {
  join: users {
    type: left_outer
    sql_on: ${orders.user_id} = ${users.id} ;;
    relationship: many_to_one
  }
}
";

/// orders, users and the model joining them.
pub fn shop() -> Vec<(&'static str, &'static str)> {
    vec![
        ("orders.view.lkml", ORDERS_VIEW),
        ("users.view.lkml", USERS_VIEW),
        ("shop.model.lkml", SHOP_MODEL),
    ]
}
